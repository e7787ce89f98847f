use chrono::NaiveDate;
use holdex_core::amount::{parse_grouped, parse_number, round_money, strip_thousands, sum_money};
use holdex_core::date::parse_statement_date;
use holdex_core::{DraftState, Holding, HoldingsMap};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::classifier::{amount_prefix, LineClass, LineClassifier};
use crate::columns::{tokens, Column, ColumnLayout, FieldRole};
use crate::error::ImportError;

/// Folio line: `<folio>/<suffix> <market value> ...`.
pub fn default_key_columns() -> ColumnLayout {
    ColumnLayout::new(&[
        (FieldRole::Folio, Column::Index(0)),
        (FieldRole::MarketValue, Column::Index(1)),
    ])
}

/// ISIN line: `<units> <nav date> <nav> <isin> <cost value>`.
pub fn default_identifier_columns() -> ColumnLayout {
    ColumnLayout::new(&[
        (FieldRole::Units, Column::Index(0)),
        (FieldRole::ValuationDate, Column::Index(1)),
        (FieldRole::Price, Column::Index(2)),
        (FieldRole::CostValue, Column::Index(4)),
    ])
}

/// The single in-progress record of a consolidated statement scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldingDraft {
    pub folio: Option<String>,
    pub isin: Option<String>,
    pub valuation_date: Option<NaiveDate>,
    pub price: Option<Decimal>,
    pub units: Option<Decimal>,
    pub cost_value: Option<Decimal>,
    pub market_value: Option<Decimal>,
}

impl HoldingDraft {
    pub fn state(&self) -> DraftState {
        let has_value = self.market_value.is_some_and(|v| !v.is_zero());
        match (has_value, self.isin.is_some()) {
            (true, true) => DraftState::ReadyToCommit,
            (true, false) => DraftState::AwaitingIdentifier,
            (false, _) => DraftState::AwaitingKey,
        }
    }

    fn into_holding(self) -> Holding {
        Holding {
            folio: self.folio.unwrap_or_default(),
            isin: self.isin.unwrap_or_default(),
            valuation_date: self.valuation_date,
            price: self.price.unwrap_or_default(),
            units: self.units.unwrap_or_default(),
            cost_value: self.cost_value.unwrap_or_default(),
            market_value: self.market_value.unwrap_or_default(),
        }
    }
}

/// Line grammar of a consolidated account statement.
#[derive(Debug, Clone)]
pub struct ConsolidatedGrammar {
    pub(crate) classifier: LineClassifier,
    pub(crate) key_columns: ColumnLayout,
    pub(crate) identifier_columns: ColumnLayout,
}

impl Default for ConsolidatedGrammar {
    fn default() -> Self {
        Self {
            classifier: LineClassifier::consolidated(),
            key_columns: default_key_columns(),
            identifier_columns: default_identifier_columns(),
        }
    }
}

impl ConsolidatedGrammar {
    pub fn scan(&self) -> ConsolidatedScan<'_> {
        ConsolidatedScan {
            grammar: self,
            draft: HoldingDraft::default(),
            holdings: HoldingsMap::new(),
        }
    }

    /// Scan every line of `text`; an incomplete trailing draft is discarded.
    pub fn holdings(&self, text: &str) -> HoldingsMap<Holding> {
        let mut scan = self.scan();
        for line in text.split('\n') {
            scan.feed(line);
        }
        scan.finish()
    }

    pub fn parse(&self, text: &str) -> Result<ConsolidatedStatement, ImportError> {
        let holdings = self.holdings(text);
        if holdings.is_empty() {
            return Err(ImportError::InvalidInput);
        }
        tracing::info!(holdings = holdings.len(), "parsed consolidated statement");
        Ok(ConsolidatedStatement { holdings })
    }
}

/// A running scan: one live draft plus the records committed so far.
#[derive(Debug)]
pub struct ConsolidatedScan<'g> {
    grammar: &'g ConsolidatedGrammar,
    draft: HoldingDraft,
    holdings: HoldingsMap<Holding>,
}

impl ConsolidatedScan<'_> {
    /// Feed one raw line and return the draft state after any commit.
    pub fn feed(&mut self, line: &str) -> DraftState {
        let line = line.trim();

        match self.grammar.classifier.classify(line) {
            LineClass::Ignored => {
                tracing::debug!(line, "skipping boilerplate line");
                return self.draft.state();
            }
            LineClass::Key => self.apply_key_line(line),
            LineClass::Identifier(isin) => self.apply_identifier_line(line, isin),
            LineClass::Other => {}
        }

        if self.draft.state() == DraftState::ReadyToCommit {
            let holding = std::mem::take(&mut self.draft).into_holding();
            tracing::debug!(
                isin = %holding.isin,
                market_value = %holding.market_value,
                "committed holding"
            );
            self.holdings.insert(holding);
        }
        self.draft.state()
    }

    pub fn draft(&self) -> &HoldingDraft {
        &self.draft
    }

    pub fn holdings(&self) -> &HoldingsMap<Holding> {
        &self.holdings
    }

    pub fn finish(self) -> HoldingsMap<Holding> {
        if self.draft != HoldingDraft::default() {
            tracing::debug!(state = ?self.draft.state(), "discarding incomplete draft");
        }
        self.holdings
    }

    fn apply_key_line(&mut self, line: &str) {
        let parts = tokens(line);
        if parts.len() < 2 {
            return;
        }
        let columns = &self.grammar.key_columns;

        let folio = columns
            .field(FieldRole::Folio, &parts)
            .and_then(|t| t.split('/').next())
            .map(str::trim);
        let market_value = columns
            .field(FieldRole::MarketValue, &parts)
            .map(strip_thousands)
            .and_then(|t| amount_prefix(&t).and_then(parse_number))
            .filter(|v| !v.is_zero());

        if let (Some(folio), Some(market_value)) = (folio, market_value) {
            self.draft.folio = Some(folio.to_string());
            self.draft.market_value = Some(market_value);
        }
    }

    fn apply_identifier_line(&mut self, line: &str, isin: &str) {
        let parts = tokens(line);
        let columns = &self.grammar.identifier_columns;
        let number = |role| columns.field(role, &parts).and_then(parse_grouped);

        if let Some(units) = number(FieldRole::Units) {
            self.draft.units = Some(units);
        }
        let date = columns.field(FieldRole::ValuationDate, &parts).and_then(parse_statement_date);
        if let Some(date) = date {
            self.draft.valuation_date = Some(date);
        }
        if let Some(price) = number(FieldRole::Price) {
            self.draft.price = Some(price);
        }
        self.draft.isin = Some(isin.to_string());
        if let Some(cost) = number(FieldRole::CostValue) {
            self.draft.cost_value = Some(cost);
        }
    }
}

/// Everything recovered from a consolidated account statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedStatement {
    pub holdings: HoldingsMap<Holding>,
}

/// Portfolio-level totals over the committed holdings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortfolioSummary {
    pub invested: Decimal,
    pub current: Decimal,
    pub returns: Decimal,
    /// Returns as a percentage of the invested amount; `None` when nothing was
    /// invested or the ratio does not fit a `Decimal`.
    pub returns_percentage: Option<Decimal>,
}

impl ConsolidatedStatement {
    pub fn summary(&self) -> PortfolioSummary {
        let invested = sum_money(self.holdings.values().map(|h| h.cost_value));
        let current = sum_money(self.holdings.values().map(|h| h.market_value));
        let returns = current.saturating_sub(invested);
        let returns_percentage = returns
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|r| r.checked_div(invested))
            .map(round_money);
        PortfolioSummary { invested, current, returns, returns_percentage }
    }
}
