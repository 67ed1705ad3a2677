//! Argv-driven command dispatch for the subscription tracker.

use chrono::{Datelike, Local, NaiveDate};
use uuid::Uuid;

use crate::cli::output;
use crate::config::{Config, ConfigManager};
use crate::core::services::{
    ReportService, ServiceError, SubscriptionFilter, SubscriptionService,
};
use crate::currency::{format_amount, Currency};
use crate::domain::subscription::parse_anchor_date;
use crate::domain::{Subscription, SubscriptionDraft};
use crate::errors::SubtrackError;
use crate::schedule;
use crate::storage::{JsonStorage, StorageBackend};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Subtrack(#[from] SubtrackError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("{0}")]
    Usage(String),
}

pub fn run_cli() -> Result<(), CliError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        print_help();
        return Ok(());
    };

    match command.as_str() {
        "add" => cmd_add(rest),
        "list" => cmd_list(rest),
        "remove" => cmd_remove(rest),
        "next" => cmd_next(rest),
        "month" => cmd_month(rest),
        "report" => cmd_report(rest),
        "schedule" => cmd_schedule(rest),
        "config" => cmd_config(rest),
        "export" => cmd_export(rest),
        "import" => cmd_import(rest),
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        other => Err(CliError::Usage(format!(
            "unknown command `{other}`; run `subtrack_cli help`"
        ))),
    }
}

fn storage() -> Result<JsonStorage, CliError> {
    Ok(JsonStorage::new_default()?)
}

fn load_config() -> Result<Config, CliError> {
    Ok(ConfigManager::new()?.load()?)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn cmd_add(rest: &[String]) -> Result<(), CliError> {
    let [name, amount, currency, cycle, category, anchor] = rest else {
        return Err(CliError::Usage(
            "usage: add <name> <amount> <currency> <cycle> <category> <anchor YYYY-MM-DD>".into(),
        ));
    };
    let draft = SubscriptionDraft {
        name: name.clone(),
        amount: amount
            .parse::<f64>()
            .map_err(|_| CliError::Usage(format!("`{amount}` is not a number")))?,
        currency: currency.parse::<Currency>().map_err(SubtrackError::from)?,
        billing_cycle: cycle.parse().map_err(SubtrackError::from)?,
        category: category.parse().map_err(SubtrackError::from)?,
        anchor_date: parse_anchor_date(anchor)?,
    };

    let store = storage()?;
    let mut subscriptions = store.load()?;
    let id = SubscriptionService::add(&mut subscriptions, draft)?;
    store.save(&subscriptions)?;
    output::success(format!("added `{name}` ({id})"));
    Ok(())
}

fn cmd_list(rest: &[String]) -> Result<(), CliError> {
    let mut filter = SubscriptionFilter::default();
    let mut iter = rest.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| CliError::Usage(format!("`{flag}` expects a value")))?;
        match flag.as_str() {
            "--name" => filter.name = Some(value.clone()),
            "--category" => filter.category = Some(value.parse().map_err(SubtrackError::from)?),
            "--cycle" => filter.billing_cycle = Some(value.parse().map_err(SubtrackError::from)?),
            other => {
                return Err(CliError::Usage(format!(
                    "unknown flag `{other}` (expected --name/--category/--cycle)"
                )))
            }
        }
    }

    let subscriptions = storage()?.load()?;
    let matched = SubscriptionService::filter(&subscriptions, &filter);
    if matched.is_empty() {
        output::info("no subscriptions matched");
        return Ok(());
    }

    let reference = today();
    output::section("Subscriptions");
    for subscription in matched {
        output::plain(format_row(subscription, reference));
    }
    Ok(())
}

fn format_row(subscription: &Subscription, reference: NaiveDate) -> String {
    let due = schedule::next_payment_date(
        subscription.anchor_date,
        reference,
        subscription.billing_cycle,
    );
    format!(
        "{:<36}  {:<20} {:>12}  {:<8} {:<13} next {}",
        subscription.id.to_string(),
        truncate(&subscription.name, 20),
        format_amount(subscription.amount, subscription.currency),
        subscription.billing_cycle.code(),
        subscription.category.code(),
        due
    )
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let kept: String = name.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

fn cmd_remove(rest: &[String]) -> Result<(), CliError> {
    let [token] = rest else {
        return Err(CliError::Usage("usage: remove <id-or-name>".into()));
    };
    let store = storage()?;
    let mut subscriptions = store.load()?;
    let id = resolve(&subscriptions, token)?;
    let removed = SubscriptionService::remove(&mut subscriptions, id)?;
    store.save(&subscriptions)?;
    output::success(format!("removed `{}`", removed.name));
    Ok(())
}

fn cmd_next(rest: &[String]) -> Result<(), CliError> {
    let (token, reference) = match rest {
        [token] => (token, today()),
        [token, from] => (token, parse_anchor_date(from)?),
        _ => {
            return Err(CliError::Usage(
                "usage: next <id-or-name> [from YYYY-MM-DD]".into(),
            ))
        }
    };
    let subscriptions = storage()?.load()?;
    let id = resolve(&subscriptions, token)?;
    let subscription =
        SubscriptionService::get(&subscriptions, id).ok_or(SubtrackError::NotFound(id))?;
    let due = schedule::next_payment_date(
        subscription.anchor_date,
        reference,
        subscription.billing_cycle,
    );
    output::plain(format!("{} pays next on {}", subscription.name, due));
    Ok(())
}

fn cmd_month(rest: &[String]) -> Result<(), CliError> {
    let reference = match rest {
        [] => today(),
        [date] => parse_anchor_date(date)?,
        _ => return Err(CliError::Usage("usage: month [YYYY-MM-DD]".into())),
    };
    let config = load_config()?;
    let subscriptions = storage()?.load()?;
    let total = ReportService::current_month_total(
        &subscriptions,
        reference,
        config.display_currency,
        config.rate(),
    );
    output::section(format!(
        "{} {} total",
        schedule::month_label(reference.month()),
        reference.year()
    ));
    output::plain(format_amount(total, config.display_currency));
    output::info(format!("rate: $1 = ¥{:.2}", config.exchange_rate));
    Ok(())
}

fn cmd_report(rest: &[String]) -> Result<(), CliError> {
    let year = match rest {
        [] => today().year(),
        [year] => year
            .parse::<i32>()
            .map_err(|_| CliError::Usage(format!("`{year}` is not a year")))?,
        _ => return Err(CliError::Usage("usage: report [year]".into())),
    };
    let config = load_config()?;
    let subscriptions = storage()?.load()?;
    let buckets = ReportService::monthly_totals(
        &subscriptions,
        year,
        config.display_currency,
        config.rate(),
    );
    output::section(format!("Monthly totals {year} ({})", config.display_currency));
    for bucket in &buckets {
        output::plain(format!(
            "{:<4} {:>12}",
            bucket.month,
            format_amount(bucket.total, config.display_currency)
        ));
        for contribution in &bucket.contributions {
            if contribution.is_yearly {
                output::plain(format!(
                    "       - {} {} (yearly)",
                    contribution.name,
                    format_amount(contribution.amount, config.display_currency)
                ));
            }
        }
    }
    Ok(())
}

fn cmd_schedule(rest: &[String]) -> Result<(), CliError> {
    let month_start = match rest {
        [] => {
            let now = today();
            schedule::month_start(now.year(), now.month())
        }
        [month] => parse_month(month)?,
        _ => return Err(CliError::Usage("usage: schedule [YYYY-MM]".into())),
    };
    let config = load_config()?;
    let subscriptions = storage()?.load()?;
    let due = ReportService::payment_schedule(
        &subscriptions,
        month_start,
        config.display_currency,
        config.rate(),
    );
    output::section(format!(
        "Payments due {} {}",
        schedule::month_label(month_start.month()),
        month_start.year()
    ));
    if due.is_empty() {
        output::info("nothing due this month");
        return Ok(());
    }
    for payment in due {
        output::plain(format!(
            "{}  {:<20} {:>12}{}",
            payment.due_date,
            truncate(&payment.name, 20),
            format_amount(payment.amount, config.display_currency),
            if payment.billing_cycle == crate::domain::BillingCycle::Yearly {
                " (yearly)"
            } else {
                ""
            }
        ));
    }
    Ok(())
}

fn cmd_config(rest: &[String]) -> Result<(), CliError> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load()?;
    match rest {
        [] | [_] if matches!(rest.first().map(String::as_str), None | Some("show")) => {
            output::section("Config");
            output::plain(format!("display currency: {}", config.display_currency));
            output::plain(format!("exchange rate:    $1 = ¥{:.2}", config.exchange_rate));
            Ok(())
        }
        [key, value] if key.as_str() == "currency" => {
            config.display_currency = value.parse::<Currency>().map_err(SubtrackError::from)?;
            manager.save(&config)?;
            output::success(format!("display currency set to {}", config.display_currency));
            Ok(())
        }
        [key, value] if key.as_str() == "rate" => {
            let rate = value
                .parse::<f64>()
                .map_err(|_| CliError::Usage(format!("`{value}` is not a number")))?;
            if !rate.is_finite() || rate <= 0.0 {
                return Err(CliError::Usage("rate must be a positive number".into()));
            }
            config.exchange_rate = rate;
            manager.save(&config)?;
            output::success(format!("exchange rate set to {:.2}", rate));
            Ok(())
        }
        _ => Err(CliError::Usage(
            "usage: config [show | currency <JPY|USD> | rate <value>]".into(),
        )),
    }
}

fn cmd_export(rest: &[String]) -> Result<(), CliError> {
    let [path] = rest else {
        return Err(CliError::Usage("usage: export <path>".into()));
    };
    let store = storage()?;
    let subscriptions = store.load()?;
    store.export_to_path(&subscriptions, path.as_ref())?;
    output::success(format!(
        "exported {} subscriptions to {path}",
        subscriptions.len()
    ));
    Ok(())
}

fn cmd_import(rest: &[String]) -> Result<(), CliError> {
    let [path] = rest else {
        return Err(CliError::Usage("usage: import <path>".into()));
    };
    let store = storage()?;
    let imported = store.import_from_path(path.as_ref())?;
    output::success(format!("imported {} subscriptions", imported.len()));
    Ok(())
}

fn resolve(subscriptions: &[Subscription], token: &str) -> Result<Uuid, CliError> {
    if let Ok(id) = Uuid::parse_str(token) {
        return match SubscriptionService::get(subscriptions, id) {
            Some(_) => Ok(id),
            None => Err(SubtrackError::NotFound(id).into()),
        };
    }
    let matches: Vec<&Subscription> = subscriptions
        .iter()
        .filter(|subscription| subscription.name.eq_ignore_ascii_case(token))
        .collect();
    match matches.as_slice() {
        [only] => Ok(only.id),
        [] => Err(CliError::Usage(format!("no subscription named `{token}`"))),
        _ => Err(CliError::Usage(format!(
            "`{token}` is ambiguous; use the id"
        ))),
    }
}

fn parse_month(raw: &str) -> Result<NaiveDate, CliError> {
    let parsed = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .map_err(|_| CliError::Usage(format!("`{raw}` is not a YYYY-MM month")))?;
    Ok(parsed)
}

fn print_help() {
    output::section("subtrack_cli");
    output::plain("  add <name> <amount> <currency> <cycle> <category> <anchor>");
    output::plain("  list [--name <q>] [--category <c>] [--cycle <monthly|yearly>]");
    output::plain("  remove <id-or-name>");
    output::plain("  next <id-or-name> [from]");
    output::plain("  month [YYYY-MM-DD]        current-month total");
    output::plain("  report [year]             12-month breakdown");
    output::plain("  schedule [YYYY-MM]        payments due in a month");
    output::plain("  config [show | currency <JPY|USD> | rate <value>]");
    output::plain("  export <path> / import <path>");
}
