//! One-shot commands working on a single day

use bjournal_core::config::Config;
use bjournal_core::date::{day_key, day_title, parse_date};
use bjournal_core::fs::RealFileSystem;
use bjournal_core::{Category, DailyLog, LogStore, PreviousDayPolicy};

fn open_store(config: &Config) -> LogStore<RealFileSystem> {
    LogStore::new(RealFileSystem, &config.journal_dir)
        .with_previous_day_policy(PreviousDayPolicy::StrictlyBefore)
}

/// Plain-text rendering of a day, one entry per line with sub-logs indented.
pub fn format_day(day: &DailyLog) -> String {
    let mut out = String::new();
    for log in day.logs() {
        push_line(&mut out, 0, log.mark, &log.name, log.important);
        for sub_log in log.sub_logs() {
            push_line(&mut out, 1, sub_log.mark, &sub_log.name, sub_log.important);
        }
    }
    out
}

fn push_line(out: &mut String, depth: usize, mark: Category, name: &str, important: bool) {
    out.push_str(&"   ".repeat(depth));
    out.push(mark.glyph());
    out.push(' ');
    out.push_str(name);
    if important {
        out.push_str(" !");
    }
    out.push('\n');
}

/// Handle the show command
pub fn handle_show(config: &Config, date: &str) -> bool {
    let date = match parse_date(date) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };

    let mut store = open_store(config);
    match store.read_day(date) {
        Ok(day) => {
            println!("{}", day_title(&date));
            if day.logs().is_empty() {
                println!("  (no entries)");
            } else {
                print!("{}", format_day(day));
            }
            true
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            false
        }
    }
}

/// Handle the add command
pub fn handle_add(config: &Config, text: &str, kind: &str, date: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        eprintln!("✗ Entry text is empty");
        return false;
    }

    let category: Category = match kind.parse() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };

    let date = match parse_date(date) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };

    let mut store = open_store(config);
    match store.add_new_log(date, text, category) {
        Ok(_) => {
            println!("✓ {} {} ({})", category.glyph(), text, day_key(&date));
            true
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            false
        }
    }
}

/// Handle the migrate command
pub fn handle_migrate(config: &Config, from: Option<&str>, to: &str) -> bool {
    let to = match parse_date(to) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };

    let mut store = open_store(config);

    let from = match from.map(parse_date).transpose() {
        Ok(Some(d)) => d,
        Ok(None) => match store.previous_date(to) {
            Some(d) => d,
            None => {
                eprintln!("✗ No day before {} to migrate from", day_key(&to));
                return false;
            }
        },
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };

    if from == to {
        eprintln!("✗ Cannot migrate {} onto itself", day_key(&to));
        return false;
    }

    match store.migrate_all(from, to) {
        Ok(carried) => {
            println!(
                "✓ Carried {} entries from {} to {}",
                carried,
                day_key(&from),
                day_key(&to)
            );
            true
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            false
        }
    }
}
