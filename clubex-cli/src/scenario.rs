//! TOML scenario schema and deterministic replay.
//!
//! A scenario declares the engine wiring (admin, owner, fee account), a set
//! of funded accounts, and an ordered list of timestamped steps. Replay
//! applies the steps to a fresh exchange in order and records one outcome
//! per step; engine failures are recorded, not fatal, since every failed
//! operation leaves the exchange untouched.

use anyhow::{Context, Result};
use clubex_core::{
    AcceptanceRule, AccountId, Amount, Club, ClubId, EngineConfig, Exchange, FutureId,
    InMemoryLedger, PositionId, PositionSide, SettlementProgress, StaticAccess,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub engine: EngineSection,
    #[serde(default)]
    pub accounts: Vec<AccountSection>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
pub struct EngineSection {
    pub admin: String,
    pub owner: String,
    pub fee_account: String,
    #[serde(default)]
    pub fee_bps: u16,
    #[serde(default)]
    pub acceptance_rule: AcceptanceRule,
}

#[derive(Debug, Deserialize)]
pub struct AccountSection {
    pub address: String,
    /// Decimal token amount, e.g. "1000" or "0.5".
    pub balance: String,
    /// Spending allowance granted to the engine; defaults to the balance.
    pub allowance: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Step {
    /// Unix seconds supplied to time-gated operations.
    pub at: i64,
    pub caller: String,
    #[serde(flatten)]
    pub op: Op,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Op {
    RegisterClub {
        name: String,
        symbol: String,
    },
    SetClubStockPrice {
        club: u64,
        price: String,
    },
    RegisterFutureDate {
        execution_time: i64,
    },
    UpdateFutureDate {
        future: u64,
        execution_time: i64,
    },
    SetPositionFee {
        fee_bps: u16,
    },
    OpenPosition {
        club: u64,
        quantity: u64,
        side: PositionSide,
        price_limit: String,
        future: u64,
    },
    ClosePosition {
        position: u64,
    },
    ExecuteFuture {
        future: u64,
    },
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("parsing scenario TOML")
    }
}

/// Outcome of one replayed step. `outcome` carries either a short success
/// description or the engine's error message.
#[derive(Debug, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub at: i64,
    pub caller: String,
    pub action: String,
    pub outcome: Result<String, String>,
}

/// Final state snapshot after replay.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub clubs: Vec<Club>,
    pub open_positions: usize,
    pub locked_margin: String,
    pub pooled: String,
    pub balances: Vec<(String, String)>,
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepOutcome>,
    pub summary: Summary,
}

fn parse_amount(text: &str, what: &str) -> Result<Amount> {
    text.parse::<Amount>()
        .with_context(|| format!("parsing {what} '{text}'"))
}

/// Build the exchange a scenario describes and replay every step.
pub fn replay(scenario: &Scenario) -> Result<ReplayReport> {
    let mut ledger = InMemoryLedger::new();
    for account in &scenario.accounts {
        let address = AccountId::new(account.address.clone());
        let balance = parse_amount(&account.balance, "balance")?;
        let allowance = match &account.allowance {
            Some(text) => parse_amount(text, "allowance")?,
            None => balance,
        };
        ledger.credit(&address, balance);
        ledger.approve(&address, allowance);
    }

    let access = StaticAccess::new(
        AccountId::new(scenario.engine.owner.clone()),
        AccountId::new(scenario.engine.admin.clone()),
    );
    let config = EngineConfig::default()
        .with_acceptance_rule(scenario.engine.acceptance_rule)
        .with_fee_bps(scenario.engine.fee_bps);
    let mut ex = Exchange::new(
        config,
        ledger,
        access,
        AccountId::new(scenario.engine.fee_account.clone()),
    );

    let mut outcomes = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let caller = AccountId::new(step.caller.clone());
        let (action, outcome) = apply(&mut ex, &caller, step)?;
        outcomes.push(StepOutcome {
            index,
            at: step.at,
            caller: step.caller.clone(),
            action,
            outcome,
        });
    }

    let mut balances: Vec<(String, String)> = scenario
        .accounts
        .iter()
        .map(|a| {
            let address = AccountId::new(a.address.clone());
            (a.address.clone(), ex.ledger().balance_of(&address).to_string())
        })
        .collect();
    balances.sort();

    let summary = Summary {
        clubs: ex.get_all_clubs().to_vec(),
        open_positions: ex.get_all_positions().len(),
        locked_margin: ex.total_locked_margin().to_string(),
        pooled: ex.ledger().pooled().to_string(),
        balances,
    };
    Ok(ReplayReport {
        steps: outcomes,
        summary,
    })
}

/// Apply one step. Returns the action label and the engine outcome; only
/// scenario-level problems (unparseable amounts) abort the replay.
fn apply(
    ex: &mut Exchange<InMemoryLedger, StaticAccess>,
    caller: &AccountId,
    step: &Step,
) -> Result<(String, Result<String, String>)> {
    Ok(match &step.op {
        Op::RegisterClub { name, symbol } => (
            format!("register-club {name} ({symbol})"),
            ex.register_club(caller, name, symbol)
                .map(|id| format!("club {id}"))
                .map_err(|e| e.to_string()),
        ),
        Op::SetClubStockPrice { club, price } => {
            let price = parse_amount(price, "price")?;
            (
                format!("set-club-stock-price club {club} -> {price}"),
                ex.set_club_stock_price(caller, ClubId(*club), price)
                    .map(|_| "ok".to_string())
                    .map_err(|e| e.to_string()),
            )
        }
        Op::RegisterFutureDate { execution_time } => (
            format!("register-future-date @{execution_time}"),
            ex.register_future_date(caller, *execution_time)
                .map(|id| format!("future {id}"))
                .map_err(|e| e.to_string()),
        ),
        Op::UpdateFutureDate {
            future,
            execution_time,
        } => (
            format!("update-future-date future {future} -> @{execution_time}"),
            ex.update_future_date(caller, FutureId(*future), *execution_time)
                .map(|_| "ok".to_string())
                .map_err(|e| e.to_string()),
        ),
        Op::SetPositionFee { fee_bps } => (
            format!("set-position-fee {fee_bps} bps"),
            ex.set_position_fee(caller, *fee_bps)
                .map(|_| "ok".to_string())
                .map_err(|e| e.to_string()),
        ),
        Op::OpenPosition {
            club,
            quantity,
            side,
            price_limit,
            future,
        } => {
            let limit = parse_amount(price_limit, "price_limit")?;
            (
                format!("open-position club {club} x{quantity} {side:?} future {future}"),
                ex.open_position(
                    caller,
                    step.at,
                    ClubId(*club),
                    *quantity,
                    *side,
                    limit,
                    FutureId(*future),
                )
                .map(|id| format!("position {id}"))
                .map_err(|e| e.to_string()),
            )
        }
        Op::ClosePosition { position } => (
            format!("close-position {position}"),
            ex.close_position(caller, PositionId(*position))
                .map(|refund| format!("refunded {refund}"))
                .map_err(|e| e.to_string()),
        ),
        Op::ExecuteFuture { future } => (
            format!("execute-future {future}"),
            loop {
                // Drive batched settlement until it completes.
                match ex.execute_future(FutureId(*future)) {
                    Ok(SettlementProgress::Settled { folded }) => {
                        break Ok(format!("settled, folded {folded}"))
                    }
                    Ok(SettlementProgress::InProgress { .. }) => continue,
                    Err(e) => break Err(e.to_string()),
                }
            },
        ),
    })
}
