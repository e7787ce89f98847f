use chrono::NaiveDate;
use holdex_core::amount::{parse_grouped, parse_number};
use holdex_core::date::parse_day_month_year;
use holdex_core::{BrokerageHolding, DraftState, HoldingsMap};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::classifier::{re_holding_date, re_holdings_heading, re_total, LineClassifier};
use crate::columns::{tokens, Column, ColumnLayout, FieldRole};
use crate::error::ImportError;
use crate::reconcile::{default_tolerance, reconcile, Reconciliation};

/// Holding row: `<isin> <name...> <units> ... <rate> <value>`.
pub fn default_brokerage_columns() -> ColumnLayout {
    ColumnLayout::new(&[
        (FieldRole::Units, Column::FirstNumeric),
        (FieldRole::Rate, Column::FromEnd(2)),
        (FieldRole::Value, Column::FromEnd(1)),
    ])
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrokerageDraft {
    pub isin: Option<String>,
    pub rate: Decimal,
    pub units: Decimal,
    pub value: Decimal,
}

impl BrokerageDraft {
    pub fn state(&self) -> DraftState {
        let has_values = !self.rate.is_zero() && !self.units.is_zero() && !self.value.is_zero();
        match (has_values, self.isin.is_some()) {
            (true, true) => DraftState::ReadyToCommit,
            (true, false) => DraftState::AwaitingIdentifier,
            (false, _) => DraftState::AwaitingKey,
        }
    }

    fn into_holding(self) -> BrokerageHolding {
        BrokerageHolding {
            isin: self.isin.unwrap_or_default(),
            rate: self.rate,
            units: self.units,
            value: self.value,
        }
    }
}

/// Line grammar of a brokerage holdings statement.
///
/// Scanning starts at the first line matching one of `headings`. From there
/// every line may update the statement date, the reported total and the
/// draft's identifier, and every line re-derives units, rate and value from
/// its token positions.
#[derive(Debug, Clone)]
pub struct BrokerageGrammar {
    pub(crate) classifier: LineClassifier,
    pub(crate) headings: Vec<Regex>,
    pub(crate) date: Regex,
    pub(crate) total: Regex,
    pub(crate) columns: ColumnLayout,
    pub(crate) tolerance: Decimal,
}

impl Default for BrokerageGrammar {
    fn default() -> Self {
        Self {
            classifier: LineClassifier::brokerage(),
            headings: vec![re_holdings_heading().clone()],
            date: re_holding_date().clone(),
            total: re_total().clone(),
            columns: default_brokerage_columns(),
            tolerance: default_tolerance(),
        }
    }
}

impl BrokerageGrammar {
    pub fn scan(&self) -> BrokerageScan<'_> {
        BrokerageScan {
            grammar: self,
            in_holdings: false,
            draft: BrokerageDraft::default(),
            holdings: HoldingsMap::new(),
            holding_date: None,
            reported_total: Decimal::ZERO,
        }
    }

    pub fn parse(&self, text: &str) -> Result<BrokerageStatement, ImportError> {
        let mut scan = self.scan();
        for line in text.split('\n') {
            scan.feed(line);
        }
        if !scan.in_holdings() {
            tracing::warn!("no holdings heading found");
        }

        let statement = scan.finish();
        if statement.holdings.is_empty() {
            return Err(ImportError::InvalidInput);
        }

        let r = &statement.reconciliation;
        if r.is_valid {
            tracing::info!(
                holdings = statement.holdings.len(),
                total = %r.computed_total,
                "parsed brokerage statement"
            );
        } else {
            tracing::warn!(
                reported = %r.reported_total,
                computed = %r.computed_total,
                difference = %r.difference,
                "holdings do not reconcile with reported total"
            );
        }
        Ok(statement)
    }
}

/// A running scan over a brokerage statement.
#[derive(Debug)]
pub struct BrokerageScan<'g> {
    grammar: &'g BrokerageGrammar,
    in_holdings: bool,
    draft: BrokerageDraft,
    holdings: HoldingsMap<BrokerageHolding>,
    holding_date: Option<NaiveDate>,
    reported_total: Decimal,
}

impl BrokerageScan<'_> {
    /// Feed one raw line and return the draft state after any commit.
    pub fn feed(&mut self, line: &str) -> DraftState {
        let g = self.grammar;
        if !self.in_holdings {
            if !g.headings.iter().any(|re| re.is_match(line)) {
                return self.draft.state();
            }
            tracing::debug!(line, "entering holdings section");
            self.in_holdings = true;
        }

        let line = line.trim();
        if g.classifier.is_ignored(line) {
            return self.draft.state();
        }

        if let Some(m) = g.date.find(line) {
            if let Some(date) = parse_day_month_year(m.as_str()) {
                self.holding_date = Some(date);
            }
        }
        let total = g
            .total
            .captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_grouped(m.as_str()));
        if let Some(total) = total {
            self.reported_total = total;
        }
        if let Some(isin) = g.classifier.identifier(line) {
            self.draft.isin = Some(isin.to_string());
        }

        let parts = tokens(line);
        let number = |role| {
            g.columns
                .field(role, &parts)
                .and_then(parse_number)
                .unwrap_or_default()
        };
        self.draft.units = number(FieldRole::Units);
        self.draft.rate = number(FieldRole::Rate);
        self.draft.value = number(FieldRole::Value);

        if self.draft.state() == DraftState::ReadyToCommit {
            let holding = std::mem::take(&mut self.draft).into_holding();
            tracing::debug!(isin = %holding.isin, value = %holding.value, "committed holding");
            self.holdings.insert(holding);
        }
        self.draft.state()
    }

    /// Whether the holdings heading has been seen.
    pub fn in_holdings(&self) -> bool {
        self.in_holdings
    }

    pub fn draft(&self) -> &BrokerageDraft {
        &self.draft
    }

    pub fn holdings(&self) -> &HoldingsMap<BrokerageHolding> {
        &self.holdings
    }

    pub fn finish(self) -> BrokerageStatement {
        let reconciliation = reconcile(
            self.holdings.values().map(|h| h.value),
            self.reported_total,
            self.grammar.tolerance,
        );
        BrokerageStatement {
            holdings: self.holdings,
            holding_date: self.holding_date,
            reconciliation,
        }
    }
}

/// Everything recovered from a brokerage holdings statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokerageStatement {
    pub holdings: HoldingsMap<BrokerageHolding>,
    /// Statement-level "as of" date; the last date line in the holdings section.
    pub holding_date: Option<NaiveDate>,
    pub reconciliation: Reconciliation,
}

impl BrokerageStatement {
    pub fn is_valid(&self) -> bool {
        self.reconciliation.is_valid
    }

    pub fn reported_total(&self) -> Decimal {
        self.reconciliation.reported_total
    }
}
