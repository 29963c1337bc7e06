//! Static commodity board. Figures are fixed demo data, not a live feed.

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    fn of(change_pct: f64) -> Self {
        if change_pct > 0.0 {
            Trend::Up
        } else if change_pct < 0.0 {
            Trend::Down
        } else {
            Trend::Flat
        }
    }
}

struct Commodity {
    name: &'static str,
    price: u32, // ₹ per quintal
    change_pct: f64,
    demand: &'static str,
    season: &'static str,
}

const BOARD: &[Commodity] = &[
    Commodity { name: "Wheat", price: 2250, change_pct: 5.0, demand: "High", season: "Apr-Jun" },
    Commodity { name: "Rice", price: 1950, change_pct: 8.2, demand: "Peak", season: "Oct-Dec" },
    Commodity { name: "Corn", price: 1750, change_pct: -2.1, demand: "Stable", season: "Jul-Sep" },
    Commodity { name: "Cotton", price: 5250, change_pct: 3.4, demand: "High", season: "Dec-Mar" },
    Commodity { name: "Soybean", price: 4500, change_pct: 6.8, demand: "Rising", season: "Oct-Jan" },
    Commodity { name: "Mustard", price: 5000, change_pct: -1.2, demand: "Low", season: "Jan-Apr" },
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub name: &'static str,
    pub price: u32,
    pub change_pct: f64,
    pub trend: Trend,
    pub demand: &'static str,
    pub season: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MonthlyPrices {
    pub month: &'static str,
    pub wheat: u32,
    pub rice: u32,
    pub corn: u32,
    pub cotton: u32,
}

const HISTORY: [(&str, [u32; 4]); 6] = [
    ("Jan", [2000, 1800, 1500, 5000]),
    ("Feb", [2100, 1850, 1600, 5100]),
    ("Mar", [2050, 1900, 1550, 5050]),
    ("Apr", [2200, 1950, 1700, 5200]),
    ("May", [2300, 2000, 1800, 5300]),
    ("Jun", [2250, 1950, 1750, 5250]),
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/market/prices", get(prices))
        .route("/market/history", get(history))
}

pub async fn prices() -> Json<Vec<PriceQuote>> {
    Json(
        BOARD
            .iter()
            .map(|c| PriceQuote {
                name: c.name,
                price: c.price,
                change_pct: c.change_pct,
                trend: Trend::of(c.change_pct),
                demand: c.demand,
                season: c.season,
            })
            .collect(),
    )
}

pub async fn history() -> Json<Vec<MonthlyPrices>> {
    Json(
        HISTORY
            .iter()
            .map(|&(month, [wheat, rice, corn, cotton])| MonthlyPrices {
                month,
                wheat,
                rice,
                corn,
                cotton,
            })
            .collect(),
    )
}
