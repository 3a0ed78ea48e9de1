//! Command-line interface for the clinic calendars.
//!
//! This module provides an interactive terminal view of the appointments
//! and availability calendars: load records exported from the backend,
//! page through months, switch language and inspect single days.

use chrono::{Datelike, Duration, NaiveDate};
use clinicflow_calendar::adapters::{AppointmentCalendar, AvailabilityCalendar, EventSummary, MonthSnapshot};
use clinicflow_calendar::bucket::DateKey;
use clinicflow_calendar::config::CalendarConfig;
use clinicflow_calendar::error::{CalendarError, CalendarResult};
use clinicflow_calendar::locale::LocaleTable;
use clinicflow_calendar::models::{unwrap_list, Appointment, AppointmentStatus, PatientRef, PatientSummary};
use clinicflow_calendar::navigation::today;
use clinicflow_calendar::view::CalendarView;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

enum LoadedCalendar {
    Appointments(AppointmentCalendar),
    Availability(AvailabilityCalendar),
}

/// Run `$body` with `$view` bound to whichever calendar is loaded.
macro_rules! with_view {
    ($calendar:expr, $view:ident => $body:expr) => {
        match $calendar {
            LoadedCalendar::Appointments($view) => $body,
            LoadedCalendar::Availability($view) => $body,
        }
    };
}

struct CalendarCLI {
    config: CalendarConfig,
    locales: LocaleTable,
    calendar: Option<LoadedCalendar>,
    running: bool,
}

impl CalendarCLI {
    fn new(config: CalendarConfig, locales: LocaleTable) -> Self {
        CalendarCLI {
            config,
            locales,
            calendar: None,
            running: true,
        }
    }

    fn print_header(&self) {
        println!("\n{}", "=".repeat(60));
        println!("       CLINIC CALENDAR");
        println!("{}", "=".repeat(60));
    }

    fn print_menu(&self) {
        println!("\n--- Main Menu ---");
        println!("1. Load appointments (JSON)");
        println!("2. Load availability (JSON)");
        println!("3. Previous month");
        println!("4. Next month");
        println!("5. Today");
        println!("6. Switch language");
        println!("7. Show a day");
        println!("8. Export month as JSON");
        println!("9. Run demo");
        println!("10. Exit");
        println!("{}", "-".repeat(20));
    }

    fn get_input(&mut self, prompt: &str, default: Option<&str>) -> String {
        if let Some(def) = default {
            print!("{} [{}]: ", prompt, def);
        } else {
            print!("{}: ", prompt);
        }
        if let Err(e) = io::stdout().flush() {
            warn!(error = %e, "failed to flush stdout");
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => {
                // End of input: leave the menu loop after this action.
                self.running = false;
                return default.unwrap_or("").to_string();
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "failed to read input");
                self.running = false;
                return default.unwrap_or("").to_string();
            }
        }

        let input = input.trim();
        if input.is_empty() {
            default.unwrap_or("").to_string()
        } else {
            input.to_string()
        }
    }

    fn get_int_input(&mut self, prompt: &str, default: Option<i32>) -> i32 {
        loop {
            let default_str = default.map(|d| d.to_string());
            let input = self.get_input(prompt, default_str.as_deref());

            if let Ok(value) = input.parse::<i32>() {
                return value;
            }
            if !self.running {
                return default.unwrap_or(0);
            }
            println!("Please enter a valid number");
        }
    }

    fn load_appointments(&mut self) {
        println!("\n--- Load Appointments ---");
        let path = self.get_input("Path to appointments JSON", None);
        let status = self.get_input("Only this status (blank for all)", None);
        let status = if status.is_empty() {
            None
        } else {
            match AppointmentStatus::from_string(&status) {
                Ok(status) => Some(status),
                Err(e) => {
                    println!("{}", e);
                    return;
                }
            }
        };

        match read_records::<Appointment>(Path::new(&path)) {
            Ok(mut appointments) => {
                if let Some(status) = status {
                    appointments.retain(|appointment| appointment.status == status);
                    println!("Keeping {} appointments", status.name());
                }
                let mut view =
                    AppointmentCalendar::new(appointments, &self.config.language, self.locales.clone());
                attach_handlers(&mut view);
                println!("\nLoaded {} appointments", view.events().len());
                self.calendar = Some(LoadedCalendar::Appointments(view));
                self.print_month();
            }
            Err(e) => println!("Error loading appointments: {}", e),
        }
    }

    fn load_availability(&mut self) {
        println!("\n--- Load Availability ---");
        let path = self.get_input("Path to availability JSON", None);

        match read_records(Path::new(&path)) {
            Ok(entries) => {
                let mut view = AvailabilityCalendar::new(entries, &self.config.language, self.locales.clone());
                attach_handlers(&mut view);
                println!("\nLoaded {} availability entries", view.events().len());
                self.calendar = Some(LoadedCalendar::Availability(view));
                self.print_month();
            }
            Err(e) => println!("Error loading availability: {}", e),
        }
    }

    fn navigate(&mut self, step: Step) {
        let Some(calendar) = self.calendar.as_mut() else {
            println!("\nPlease load a calendar first (option 1, 2 or 9)");
            return;
        };

        with_view!(calendar, view => {
            match step {
                Step::Previous => view.go_to_previous_month(),
                Step::Next => view.go_to_next_month(),
                Step::Today => view.go_to_today(),
            };
        });
        self.print_month();
    }

    fn switch_language(&mut self) {
        println!("\n--- Switch Language ---");
        let current = self.config.language.clone();
        let language = self.get_input("Language code (en, fr, ...)", Some(current.as_str()));
        self.config.apply_language_override(Some(language));

        let language = self.config.language.clone();
        if !self.locales.contains(&language) {
            println!("'{}' is not configured; weeks start on Sunday", language);
        }
        if let Some(calendar) = self.calendar.as_mut() {
            with_view!(calendar, view => view.set_language(&language));
            self.print_month();
        }
    }

    fn show_day(&mut self) {
        if self.calendar.is_none() {
            println!("\nPlease load a calendar first (option 1, 2 or 9)");
            return;
        }

        let default = DateKey::from(today()).to_string();
        let input = self.get_input("Date (YYYY-MM-DD)", Some(default.as_str()));
        let key: DateKey = match input.parse() {
            Ok(key) => key,
            Err(_) => {
                println!("Please enter a date as YYYY-MM-DD");
                return;
            }
        };

        if let Some(calendar) = self.calendar.as_mut() {
            with_view!(calendar, view => {
                let index = match view.grid().days().iter().position(|day| day.date == key.date()) {
                    Some(index) => Some(index),
                    None => {
                        view.go_to_date(key.date());
                        view.grid().days().iter().position(|day| day.date == key.date())
                    }
                };
                if let Some(index) = index {
                    view.click_day(index);
                }
            });
        }
    }

    fn export_month(&self) {
        let Some(calendar) = self.calendar.as_ref() else {
            println!("\nPlease load a calendar first (option 1, 2 or 9)");
            return;
        };

        let snapshot = with_view!(calendar, view => MonthSnapshot::capture(view, today()));
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => println!("Error exporting month: {}", e),
        }
    }

    fn print_month(&self) {
        if let Some(calendar) = self.calendar.as_ref() {
            with_view!(calendar, view => print_grid(view));
        }
    }

    fn run_demo(&mut self) {
        println!("\n--- Running Demo ---");

        let now = today();
        let patients = [("John", "Smith"), ("Jane", "Doe"), ("Bob", "Wilson"), ("Alice", "Brown")];
        let reasons = ["Annual checkup", "Blood pressure review", "Follow-up on test results", "Prescription renewal"];

        let mut appointments = Vec::new();
        for (i, ((first, last), reason)) in patients.iter().zip(reasons.iter()).enumerate() {
            let day = now + Duration::days(i as i64 * 2);
            appointments.push(demo_appointment(
                i as u64 + 1,
                day,
                16 - i as u32 * 2,
                Some(PatientRef::Summary(PatientSummary {
                    id: i as u64 + 100,
                    first_name: Some(first.to_string()),
                    last_name: Some(last.to_string()),
                })),
                reason,
            ));
        }
        // Same day as the first one, earlier in the morning.
        appointments.push(demo_appointment(5, now, 8, Some(PatientRef::Id(105)), "Vaccination"));
        appointments.push(demo_appointment(6, now, 9, Some(PatientRef::Id(106)), ""));
        // No timestamp: stays off the calendar.
        appointments.push(Appointment {
            id: 7,
            scheduled_at: None,
            status: AppointmentStatus::Scheduled,
            patient: Some(PatientRef::Id(107)),
            doctor: None,
            reason: "Unscheduled".to_string(),
            notes: String::new(),
        });

        let mut view = AppointmentCalendar::new(appointments, &self.config.language, self.locales.clone());
        attach_handlers(&mut view);

        println!(
            "Created {} appointments, {} on the calendar",
            view.events().len(),
            view.buckets().total_events()
        );

        self.calendar = Some(LoadedCalendar::Appointments(view));
        self.print_month();
        println!("\nToday's cell lists the first two appointments and collapses the rest.");
    }

    fn run(&mut self) {
        self.print_header();

        while self.running {
            self.print_menu();

            let choice = self.get_int_input("Enter choice", Some(9));
            if !self.running {
                break;
            }

            match choice {
                1 => self.load_appointments(),
                2 => self.load_availability(),
                3 => self.navigate(Step::Previous),
                4 => self.navigate(Step::Next),
                5 => self.navigate(Step::Today),
                6 => self.switch_language(),
                7 => self.show_day(),
                8 => self.export_month(),
                9 => self.run_demo(),
                10 => {
                    self.running = false;
                    println!("\nGoodbye!");
                }
                _ => println!("Invalid choice"),
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Previous,
    Next,
    Today,
}

fn read_records<T: DeserializeOwned>(path: &Path) -> CalendarResult<Vec<T>> {
    let text = fs::read_to_string(path).map_err(CalendarError::EventsRead)?;
    let value = serde_json::from_str(&text).map_err(CalendarError::EventsDecode)?;
    let records = unwrap_list(value)?;
    info!(path = %path.display(), records = records.len(), "loaded calendar records");
    Ok(records)
}

fn attach_handlers<E: EventSummary + Clone + 'static>(view: &mut CalendarView<E>) {
    view.on_month_change(|month| info!(month = %month, "displayed month changed"));
    view.on_day_click(|date, events: &[E]| {
        println!("\n{}:", date.format("%A, %d/%m/%Y"));
        if events.is_empty() {
            println!("  (nothing scheduled)");
        }
        for event in events {
            println!("  - {}", event.summary());
        }
    });
    view.on_event_click(|event: &E| println!("Selected #{}: {}", event.event_id(), event.summary()));
}

fn demo_appointment(id: u64, day: NaiveDate, hour: u32, patient: Option<PatientRef>, reason: &str) -> Appointment {
    Appointment {
        id,
        scheduled_at: Some(format!("{}T{:02}:00", day.format("%Y-%m-%d"), hour)),
        status: AppointmentStatus::Scheduled,
        patient,
        doctor: None,
        reason: reason.to_string(),
        notes: String::new(),
    }
}

fn print_grid<E: EventSummary + Clone>(view: &CalendarView<E>) {
    let now = today();

    println!("\n{:^42}", view.month_label());
    let labels: Vec<String> = view.weekday_labels().iter().map(|l| format!("{:>6}", l)).collect();
    println!("{}", labels.join(""));

    for row in view.cells(now).chunks(7) {
        let line: Vec<String> = row
            .iter()
            .map(|cell| {
                let day = cell.day.date.day();
                let text = if cell.is_today {
                    format!("[{:>2}]", day)
                } else if cell.day.is_current_month {
                    format!(" {:>2} ", day)
                } else {
                    format!("({:>2})", day)
                };
                let marker = if cell.events.is_empty() { ' ' } else { '*' };
                format!(" {}{}", text, marker)
            })
            .collect();
        println!("{}", line.join(""));
    }

    let month = view.month();
    let busy_days: Vec<_> = view
        .cells(now)
        .into_iter()
        .filter(|cell| cell.day.is_current_month && !cell.events.is_empty())
        .collect();
    if busy_days.is_empty() {
        println!("\nNothing scheduled in {}", month);
        return;
    }

    println!();
    for cell in busy_days {
        let preview = cell.preview(clinicflow_calendar::view::PREVIEW_LIMIT);
        println!("{}:", cell.day.key());
        for event in preview.shown {
            println!("  {}", event.summary());
        }
        if let Some(more) = preview.more_label() {
            println!("  {}", more);
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clinicflow_calendar=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let config = match CalendarConfig::load(None) {
        Ok(config) => config,
        Err(e) => {
            println!("Error loading config, using defaults: {}", e);
            CalendarConfig::default()
        }
    };
    let locales = match LocaleTable::from_config(&config) {
        Ok(locales) => locales,
        Err(e) => {
            println!("Error in language table, using built-in languages: {}", e);
            LocaleTable::builtin()
        }
    };

    let mut cli = CalendarCLI::new(config, locales);
    cli.run();
}
