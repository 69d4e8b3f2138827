//! Interactive text menu over a loaded record store.

use std::io::{self, BufRead, Write};

use sales_core::formatting::format_currency;
use sales_core::models::Dimension;
use sales_data::aggregator::{AggregationResult, SalesAggregator};
use sales_data::store::RecordStore;

use crate::report;

/// What the menu loop does after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Continue,
    Exit,
}

/// Data the menu commands read.
pub struct MenuContext<'a> {
    pub store: &'a RecordStore,
    pub top_n: usize,
}

type Handler = fn(&MenuContext, &mut dyn Write) -> io::Result<MenuAction>;

/// One menu entry: accepted inputs, display label and what it runs.
pub struct MenuCommand {
    pub keys: &'static [&'static str],
    pub label: &'static str,
    pub handler: Handler,
}

pub const COMMANDS: &[MenuCommand] = &[
    MenuCommand {
        keys: &["1"],
        label: "Show total revenue",
        handler: show_total_revenue,
    },
    MenuCommand {
        keys: &["2"],
        label: "Show revenue by store",
        handler: show_revenue_by_store,
    },
    MenuCommand {
        keys: &["3"],
        label: "Show top products by revenue",
        handler: show_top_products,
    },
    MenuCommand {
        keys: &["4"],
        label: "Show revenue by channel",
        handler: show_revenue_by_channel,
    },
    MenuCommand {
        keys: &["5"],
        label: "Show revenue by category",
        handler: show_revenue_by_category,
    },
    MenuCommand {
        keys: &["6"],
        label: "Show revenue by day of week",
        handler: show_revenue_by_weekday,
    },
    MenuCommand {
        keys: &["7"],
        label: "Show data-quality report",
        handler: show_data_quality,
    },
    MenuCommand {
        keys: &["0", "q", "exit"],
        label: "Exit",
        handler: exit,
    },
];

/// Find the command accepting `input` (trimmed, case-insensitive).
pub fn lookup(input: &str) -> Option<&'static MenuCommand> {
    let choice = input.trim().to_lowercase();
    COMMANDS.iter().find(|cmd| cmd.keys.iter().any(|k| *k == choice))
}

/// Read choices from `input` until an exit command or end of input.
pub fn run_menu<R: BufRead, W: Write>(ctx: &MenuContext, mut input: R, output: &mut W) -> io::Result<()> {
    let mut line = String::new();
    loop {
        print_menu(output)?;
        write!(output, "Enter your choice: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            tracing::debug!("menu input closed");
            return Ok(());
        }

        let Some(cmd) = lookup(&line) else {
            tracing::debug!(input = line.trim(), "invalid menu choice");
            writeln!(
                output,
                "[WARNING] Invalid menu choice '{}'. Please enter 1-7, or 0 to exit.",
                line.trim()
            )?;
            continue;
        };

        if (cmd.handler)(ctx, output)? == MenuAction::Exit {
            return Ok(());
        }
    }
}

fn print_menu<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\n===== UrbanMart Menu =====")?;
    for cmd in COMMANDS {
        writeln!(out, "{}. {}", cmd.keys[0], cmd.label)?;
    }
    Ok(())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

fn show_total_revenue(ctx: &MenuContext, out: &mut dyn Write) -> io::Result<MenuAction> {
    let kpis = SalesAggregator::kpis(ctx.store.records());
    writeln!(out, "\nTotal Revenue: {}", format_currency(kpis.total_revenue))?;
    writeln!(
        out,
        "Transactions: {}  Average order value: {}",
        kpis.transaction_count,
        format_currency(kpis.average_order_value)
    )?;
    Ok(MenuAction::Continue)
}

fn show_breakdown(out: &mut dyn Write, title: &str, result: &AggregationResult) -> io::Result<MenuAction> {
    writeln!(out, "\n{title}:")?;
    write!(out, "{}", report::revenue_table(result).render())?;
    Ok(MenuAction::Continue)
}

fn show_revenue_by_store(ctx: &MenuContext, out: &mut dyn Write) -> io::Result<MenuAction> {
    let result = SalesAggregator::aggregate(ctx.store.records(), Dimension::StoreLocation);
    show_breakdown(out, "Revenue by Store", &result)
}

fn show_top_products(ctx: &MenuContext, out: &mut dyn Write) -> io::Result<MenuAction> {
    let result = SalesAggregator::top_products(ctx.store.records(), ctx.top_n);
    show_breakdown(out, &format!("Top {} Products by Revenue", ctx.top_n), &result)
}

fn show_revenue_by_channel(ctx: &MenuContext, out: &mut dyn Write) -> io::Result<MenuAction> {
    let result = SalesAggregator::aggregate(ctx.store.records(), Dimension::Channel);
    show_breakdown(out, "Revenue by Channel", &result)
}

fn show_revenue_by_category(ctx: &MenuContext, out: &mut dyn Write) -> io::Result<MenuAction> {
    let result = SalesAggregator::aggregate(ctx.store.records(), Dimension::ProductCategory);
    show_breakdown(out, "Revenue by Category", &result)
}

fn show_revenue_by_weekday(ctx: &MenuContext, out: &mut dyn Write) -> io::Result<MenuAction> {
    let result = SalesAggregator::aggregate(ctx.store.records(), Dimension::DayOfWeek);
    show_breakdown(out, "Revenue by Day of Week", &result)
}

fn show_data_quality(ctx: &MenuContext, mut out: &mut dyn Write) -> io::Result<MenuAction> {
    report::print_data_quality(&mut out, ctx.store.report())?;
    Ok(MenuAction::Continue)
}

fn exit(_ctx: &MenuContext, out: &mut dyn Write) -> io::Result<MenuAction> {
    writeln!(out, "\nExiting. Goodbye!")?;
    Ok(MenuAction::Exit)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
