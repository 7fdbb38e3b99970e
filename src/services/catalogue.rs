//! Report catalogue.
//!
//! A closed set of named aggregate reports over the dataset. Each report
//! resolves to exactly one parameter-free read statement.

use serde::Serialize;

/// A predefined report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Report {
    ProvidersPerCity,
    ReceiversPerCity,
    ProviderTypesByQuantity,
    ProviderContacts,
    TopReceiversByClaimedQuantity,
    TotalAvailableQuantity,
    CityWithMostListings,
    FoodTypeFrequency,
    ClaimsPerFoodItem,
    TopProviderByCompletedClaims,
    ClaimStatusPercentage,
    AverageQuantityPerReceiver,
    MostClaimedMealType,
    TotalDonatedPerProvider,
}

/// Catalogue entry as listed to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub key: &'static str,
    pub name: &'static str,
}

impl Report {
    /// Every report, in display order.
    pub const ALL: [Report; 14] = [
        Report::ProvidersPerCity,
        Report::ReceiversPerCity,
        Report::ProviderTypesByQuantity,
        Report::ProviderContacts,
        Report::TopReceiversByClaimedQuantity,
        Report::TotalAvailableQuantity,
        Report::CityWithMostListings,
        Report::FoodTypeFrequency,
        Report::ClaimsPerFoodItem,
        Report::TopProviderByCompletedClaims,
        Report::ClaimStatusPercentage,
        Report::AverageQuantityPerReceiver,
        Report::MostClaimedMealType,
        Report::TotalDonatedPerProvider,
    ];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProvidersPerCity => "Providers per City",
            Self::ReceiversPerCity => "Receivers per City",
            Self::ProviderTypesByQuantity => "Top Provider Types by Total Quantity",
            Self::ProviderContacts => "Provider Contacts",
            Self::TopReceiversByClaimedQuantity => "Top Receivers by Claimed Quantity",
            Self::TotalAvailableQuantity => "Total Available Quantity",
            Self::CityWithMostListings => "City with Most Listings",
            Self::FoodTypeFrequency => "Food Type Frequency",
            Self::ClaimsPerFoodItem => "Claims per Food Item",
            Self::TopProviderByCompletedClaims => "Top Provider by Completed Claims",
            Self::ClaimStatusPercentage => "Claim Status Percentage",
            Self::AverageQuantityPerReceiver => "Average Quantity Claimed per Receiver",
            Self::MostClaimedMealType => "Most Claimed Meal Type",
            Self::TotalDonatedPerProvider => "Total Donated per Provider",
        }
    }

    /// URL-safe key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ProvidersPerCity => "providers-per-city",
            Self::ReceiversPerCity => "receivers-per-city",
            Self::ProviderTypesByQuantity => "provider-types-by-quantity",
            Self::ProviderContacts => "provider-contacts",
            Self::TopReceiversByClaimedQuantity => "top-receivers-by-claimed-quantity",
            Self::TotalAvailableQuantity => "total-available-quantity",
            Self::CityWithMostListings => "city-with-most-listings",
            Self::FoodTypeFrequency => "food-type-frequency",
            Self::ClaimsPerFoodItem => "claims-per-food-item",
            Self::TopProviderByCompletedClaims => "top-provider-by-completed-claims",
            Self::ClaimStatusPercentage => "claim-status-percentage",
            Self::AverageQuantityPerReceiver => "average-quantity-per-receiver",
            Self::MostClaimedMealType => "most-claimed-meal-type",
            Self::TotalDonatedPerProvider => "total-donated-per-provider",
        }
    }

    /// The statement behind the report.
    pub fn sql(&self) -> &'static str {
        match self {
            Self::ProvidersPerCity => {
                "SELECT City, COUNT(*) AS provider_count \
                 FROM providers GROUP BY City ORDER BY provider_count DESC, City"
            }
            Self::ReceiversPerCity => {
                "SELECT City, COUNT(*) AS receiver_count \
                 FROM receivers GROUP BY City ORDER BY receiver_count DESC, City"
            }
            Self::ProviderTypesByQuantity => {
                "SELECT p.Type AS Provider_Type, SUM(f.Quantity) AS total_qty \
                 FROM food_listings f JOIN providers p ON f.Provider_ID = p.Provider_ID \
                 GROUP BY p.Type ORDER BY total_qty DESC, Provider_Type"
            }
            Self::ProviderContacts => {
                "SELECT Name, Type, City, Contact FROM providers ORDER BY City, Name"
            }
            Self::TopReceiversByClaimedQuantity => {
                "SELECT r.Name, SUM(f.Quantity) AS total_claimed \
                 FROM claims c \
                 JOIN receivers r ON c.Receiver_ID = r.Receiver_ID \
                 JOIN food_listings f ON c.Food_ID = f.Food_ID \
                 GROUP BY r.Receiver_ID, r.Name \
                 ORDER BY total_claimed DESC, r.Name LIMIT 5"
            }
            Self::TotalAvailableQuantity => {
                "SELECT COALESCE(SUM(Quantity), 0) AS total_quantity FROM food_listings"
            }
            Self::CityWithMostListings => {
                "SELECT Location AS City, COUNT(*) AS listing_count \
                 FROM food_listings GROUP BY Location \
                 ORDER BY listing_count DESC, City LIMIT 1"
            }
            Self::FoodTypeFrequency => {
                "SELECT Food_Type, COUNT(*) AS listing_count \
                 FROM food_listings GROUP BY Food_Type ORDER BY listing_count DESC, Food_Type"
            }
            Self::ClaimsPerFoodItem => {
                "SELECT f.Food_Name, COUNT(c.Claim_ID) AS claim_count \
                 FROM food_listings f LEFT JOIN claims c ON f.Food_ID = c.Food_ID \
                 GROUP BY f.Food_ID, f.Food_Name ORDER BY claim_count DESC, f.Food_Name"
            }
            Self::TopProviderByCompletedClaims => {
                "SELECT p.Name, COUNT(c.Claim_ID) AS completed_claims \
                 FROM claims c \
                 JOIN food_listings f ON c.Food_ID = f.Food_ID \
                 JOIN providers p ON f.Provider_ID = p.Provider_ID \
                 WHERE c.Status = 'Completed' \
                 GROUP BY p.Provider_ID, p.Name \
                 ORDER BY completed_claims DESC, p.Name LIMIT 1"
            }
            Self::ClaimStatusPercentage => {
                "SELECT Status, COUNT(*) * 100.0 / (SELECT COUNT(*) FROM claims) AS pct \
                 FROM claims GROUP BY Status ORDER BY Status"
            }
            Self::AverageQuantityPerReceiver => {
                "SELECT r.Name, AVG(f.Quantity) AS avg_quantity \
                 FROM claims c \
                 JOIN receivers r ON c.Receiver_ID = r.Receiver_ID \
                 JOIN food_listings f ON c.Food_ID = f.Food_ID \
                 GROUP BY r.Receiver_ID, r.Name ORDER BY avg_quantity DESC, r.Name"
            }
            Self::MostClaimedMealType => {
                "SELECT f.Meal_Type, COUNT(*) AS claim_count \
                 FROM claims c JOIN food_listings f ON c.Food_ID = f.Food_ID \
                 GROUP BY f.Meal_Type ORDER BY claim_count DESC, f.Meal_Type"
            }
            Self::TotalDonatedPerProvider => {
                "SELECT p.Name, SUM(f.Quantity) AS total_donated \
                 FROM providers p JOIN food_listings f ON p.Provider_ID = f.Provider_ID \
                 GROUP BY p.Provider_ID, p.Name ORDER BY total_donated DESC, p.Name"
            }
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.key() == key)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            key: self.key(),
            name: self.name(),
        }
    }
}

/// The catalogue as listed to clients.
pub fn catalogue() -> Vec<ReportSummary> {
    Report::ALL.iter().map(Report::summary).collect()
}
