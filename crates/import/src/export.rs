use std::io::Write;

use holdex_core::{BrokerageHolding, Holding, HoldingsMap};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const HOLDING_HEADERS: [&str; 7] = [
    "Folio",
    "ISIN",
    "NAV Date",
    "NAV",
    "Units",
    "Cost Value",
    "Market Value",
];

const BROKERAGE_HEADERS: [&str; 4] = ["ISIN", "Rate", "Units", "Value"];

/// Write consolidated holdings as CSV, one row per holding in commit order.
pub fn write_csv<W: Write>(holdings: &HoldingsMap<Holding>, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HOLDING_HEADERS)?;
    for h in holdings {
        let date = h
            .valuation_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        wtr.write_record([
            h.folio.clone(),
            h.isin.clone(),
            date,
            h.price.to_string(),
            h.units.to_string(),
            h.cost_value.to_string(),
            h.market_value.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_brokerage_csv<W: Write>(
    holdings: &HoldingsMap<BrokerageHolding>,
    writer: W,
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(BROKERAGE_HEADERS)?;
    for h in holdings {
        wtr.write_record([
            h.isin.clone(),
            h.rate.to_string(),
            h.units.to_string(),
            h.value.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Pretty-printed JSON for any statement or holdings value.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(value)?)
}
