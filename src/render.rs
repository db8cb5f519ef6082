use analytics::{AccountReport, PnlPreview};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use core_types::{Account, AnalysisResult, EconomicEvent, InstrumentGroup, Trade, format_usd};

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header.to_vec());
    table
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

pub fn accounts_table(accounts: &[(Account, f64)], active_id: Option<&str>) -> Table {
    let mut table = table(&["", "Name", "Type", "Initial Balance", "Current Balance", "Id"]);
    for (account, balance) in accounts {
        let marker = if Some(account.id.as_str()) == active_id { "*" } else { "" };
        table.add_row(vec![
            Cell::new(marker),
            Cell::new(&account.name),
            Cell::new(account.account_type),
            Cell::new(format_usd(account.initial_balance)),
            Cell::new(format_usd(*balance)),
            Cell::new(&account.id),
        ]);
    }
    table
}

pub fn trades_table(trades: &[&Trade]) -> Table {
    let mut table = table(&[
        "Date", "Instrument", "Position", "Lots", "Entry", "Exit", "Outcome", "P/L", "Strategy", "Id",
    ]);
    for trade in trades {
        table.add_row(vec![
            Cell::new(or_dash(Some(&trade.trade_date))),
            Cell::new(&trade.instrument),
            Cell::new(trade.position),
            Cell::new(trade.lot_size),
            Cell::new(trade.entry_price),
            Cell::new(trade.exit_price),
            Cell::new(trade.outcome),
            Cell::new(format_usd(trade.pnl)),
            Cell::new(or_dash(Some(&trade.strategy))),
            Cell::new(&trade.id),
        ]);
    }
    table
}

pub fn trade_detail(trade: &Trade) -> Table {
    let mut table = table(&["Field", "Value"]);
    let rows = [
        ("Id", trade.id.clone()),
        ("Date", or_dash(Some(&trade.trade_date)).to_string()),
        ("Instrument", trade.instrument.clone()),
        ("Position", trade.position.to_string()),
        ("Lot Size", trade.lot_size.to_string()),
        ("Entry", trade.entry_price.to_string()),
        ("Stop Loss", trade.stop_loss.to_string()),
        ("Take Profit", trade.take_profit.to_string()),
        ("Exit", trade.exit_price.to_string()),
        ("Outcome", trade.outcome.to_string()),
        ("P/L", format_usd(trade.pnl)),
        ("Strategy", or_dash(Some(&trade.strategy)).to_string()),
        ("Notes", or_dash(Some(&trade.notes)).to_string()),
        (
            "Screenshot",
            if trade.screenshot.is_some() { "attached" } else { "-" }.to_string(),
        ),
    ];
    for (field, value) in rows {
        table.add_row(vec![field.to_string(), value]);
    }
    table
}

pub fn preview_table(preview: &PnlPreview) -> Table {
    let mut table = table(&["Potential Profit", "Potential Loss", "P/L"]);
    table.add_row(vec![
        format_usd(preview.potential_profit),
        format_usd(preview.potential_loss),
        format_usd(preview.pnl),
    ]);
    table
}

/// The dashboard summary cards.
pub fn stats_table(report: &AccountReport) -> Table {
    let stats = &report.stats;
    let mut table = table(&["Account", "Balance", "Total P/L", "Win Rate", "Growth", "Trades"]);
    table.add_row(vec![
        report.account.name.clone(),
        format_usd(report.current_balance),
        format_usd(stats.total_pnl),
        format!("{:.2}%", stats.win_rate),
        format!("{:.2}%", stats.account_growth),
        format!(
            "{} ({}W / {}L)",
            stats.total_trades, stats.winning_trades, stats.losing_trades
        ),
    ]);
    table
}

pub fn equity_table(report: &AccountReport) -> Table {
    let mut table = table(&["Point", "Date", "Balance"]);
    for point in &report.equity_curve {
        let date = point
            .trade_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![point.label.clone(), date, format_usd(point.balance)]);
    }
    table
}

pub fn calendar_table(events: &[EconomicEvent]) -> Table {
    let mut table = table(&[
        "Time", "Currency", "Impact", "Event", "Actual", "Forecast", "Previous",
    ]);
    for event in events {
        table.add_row(vec![
            event.time.clone(),
            event.currency.clone(),
            event.impact.to_string(),
            event.event.clone(),
            or_dash(event.actual.as_deref()).to_string(),
            or_dash(event.forecast.as_deref()).to_string(),
            or_dash(event.previous.as_deref()).to_string(),
        ]);
    }
    table
}

pub fn instruments_table(groups: &[InstrumentGroup]) -> Table {
    let mut table = table(&["Group", "Instruments"]);
    for group in groups {
        table.add_row(vec![group.name.to_string(), group.instruments.join(", ")]);
    }
    table
}

pub fn analysis_text(analysis: &AnalysisResult) -> String {
    let mut out = analysis.text.trim().to_string();
    if !analysis.sources.is_empty() {
        out.push_str("\n\nSources:");
        for source in &analysis.sources {
            out.push_str(&format!("\n  - {} <{}>", source.title, source.uri));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{AccountType, INSTRUMENT_GROUPS, Impact, WebSource};

    #[test]
    fn active_account_is_marked() {
        let accounts = vec![
            (
                Account {
                    id: "a1".to_string(),
                    name: "Main".to_string(),
                    initial_balance: 1000.0,
                    account_type: AccountType::Live,
                },
                1250.0,
            ),
            (
                Account {
                    id: "a2".to_string(),
                    name: "Prop".to_string(),
                    initial_balance: 50_000.0,
                    account_type: AccountType::Funded,
                },
                50_000.0,
            ),
        ];
        let rendered = accounts_table(&accounts, Some("a2")).to_string();
        assert!(rendered.contains("$1,250.00"));
        assert!(rendered.contains("Funded"));
        let prop_line = rendered.lines().find(|l| l.contains("Prop")).unwrap();
        assert!(prop_line.contains('*'));
    }

    #[test]
    fn missing_calendar_values_show_dash() {
        let events = vec![EconomicEvent {
            time: "08:30".to_string(),
            currency: "GBP".to_string(),
            impact: Impact::Medium,
            event: "GDP m/m".to_string(),
            actual: None,
            forecast: Some("0.1%".to_string()),
            previous: Some(String::new()),
        }];
        let rendered = calendar_table(&events).to_string();
        let row = rendered.lines().find(|l| l.contains("GDP")).unwrap();
        assert_eq!(row.matches(" - ").count(), 2);
    }

    #[test]
    fn analysis_lists_sources() {
        let analysis = AnalysisResult {
            text: "Risk-off session.\n".to_string(),
            sources: vec![WebSource {
                uri: "https://example.com/a".to_string(),
                title: "Article".to_string(),
            }],
        };
        assert_eq!(
            analysis_text(&analysis),
            "Risk-off session.\n\nSources:\n  - Article <https://example.com/a>"
        );
    }

    #[test]
    fn every_group_is_listed() {
        let rendered = instruments_table(INSTRUMENT_GROUPS).to_string();
        for group in INSTRUMENT_GROUPS {
            assert!(rendered.contains(group.name));
        }
    }
}
