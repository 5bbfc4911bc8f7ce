//! Whole-week commands: show, list, save, export, reset.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use serde_json::json;
use weekplan_core::storage::data_dir;
use weekplan_core::week::WEEKDAY_NAMES_FA;
use weekplan_core::{Config, DayIndex, WeekStore};

use super::{open_session, persist, CmdResult};

pub fn show(offset: i64, as_json: bool) -> CmdResult {
    let session = open_session(offset)?;
    let window = session.window();
    let data = session.data();

    if as_json {
        let out = json!({
            "week": window,
            "label": window.label(),
            "progress": session.progress(),
            "data": data,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{} ({}, starting {})", window.key, window.label(), window.start);
    println!("Quote: {}", data.quote);
    println!();

    for (index, date) in DayIndex::all().zip(window.days.iter()) {
        let day = data.day(index);
        println!("[{index}] {} {date}", WEEKDAY_NAMES_FA[index.get()]);
        for (slot, priority) in day.priorities.iter().enumerate() {
            if !priority.is_empty() {
                println!("    priority {slot}: {priority}");
            }
        }
        for event in &day.events {
            println!("    {} {}", event.time, event.text);
        }
        for task in &day.tasks {
            let mark = if task.completed { "x" } else { " " };
            println!("    [{mark}] {} ({})", task.text, task.id);
        }
    }

    println!();
    println!("Habits ({}% done):", session.progress());
    for habit in &data.habits {
        let grid: String = habit
            .checks
            .iter()
            .map(|c| if *c { '#' } else { '.' })
            .collect();
        println!("    {grid} {} ({})", habit.name, habit.id);
    }

    println!("Reminders:");
    if data.reminders.is_empty() {
        println!("    (none)");
    }
    for reminder in &data.reminders {
        let mark = if reminder.completed { "x" } else { " " };
        println!("    [{mark}] {} ({})", reminder.text, reminder.id);
    }
    Ok(())
}

pub fn list() -> CmdResult {
    let config = Config::load()?;
    let store = WeekStore::open(&config.db_path(&data_dir()?))?;
    for key in store.weeks()? {
        println!("{key}");
    }
    Ok(())
}

pub fn save(offset: i64) -> CmdResult {
    let mut session = open_session(offset)?;
    persist(&mut session)?;
    println!("saved {}", session.window().key);
    Ok(())
}

pub fn export(offset: i64, dir: Option<PathBuf>) -> CmdResult {
    let session = open_session(offset)?;
    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let path = session.export_to_dir(&dir)?;
    println!("{}", path.display());
    Ok(())
}

fn confirm(prompt: &str) -> std::io::Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub fn reset(offset: i64, yes: bool) -> CmdResult {
    let mut session = open_session(offset)?;
    let key = session.window().key.clone();
    if !yes && !confirm(&format!("Delete all data for {key}?"))? {
        println!("aborted");
        return Ok(());
    }
    session.reset()?;
    println!("reset {key}");
    Ok(())
}
