use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use school_timetable::config::AppConfig;
use school_timetable::display::{print_generation, write_timetable_to_file, GridFilter};
use school_timetable::form::{export_timetable_to_csv, TeacherForm};
use school_timetable::registry::{registry_for_path, Roster};
use school_timetable::schedule::{generate_week, SchoolClass, Subject};
use school_timetable::telemetry::init_telemetry;
use school_timetable::web::{start_server, AppState};

#[derive(Parser, Debug)]
#[command(name = "school-timetable")]
#[command(version)]
#[command(about = "Weekly school timetable generator")]
struct Args {
    /// Teacher registry file (.json or .csv)
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a teacher with the next priority id
    AddTeacher {
        #[arg(long)]
        name: String,
        /// Subject name, e.g. "Математика"
        #[arg(long)]
        subject: String,
        /// Comma-separated class numbers or names, e.g. "1,2,5 класс"
        #[arg(long, value_delimiter = ',')]
        classes: Vec<String>,
        /// Comma-separated slot keys, e.g. "Понедельник-1,Среда-3"
        #[arg(long, value_delimiter = ',')]
        slots: Vec<String>,
    },

    /// List registered teachers
    List,

    /// Generate the weekly timetable
    Generate {
        /// Only show lessons of this class
        #[arg(long)]
        class: Option<String>,
        /// Only show lessons of this subject
        #[arg(long)]
        subject: Option<String>,
        /// Grid output file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also export assignments as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Serve the JSON API
    Web {
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = AppConfig::from_env();
    if let Some(registry) = args.registry.clone() {
        config.registry_path = registry;
    }
    if let Some(level) = args.log_level.clone() {
        config.log_level = level;
    }
    init_telemetry(&config.log_level);

    if let Err(e) = run(args.command, config).await {
        error!(error = %e, "command failed");
        std::process::exit(1);
    }
}

async fn run(command: Commands, mut config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = registry_for_path(&config.registry_path);

    match command {
        Commands::AddTeacher {
            name,
            subject,
            classes,
            slots,
        } => {
            let new_teacher = TeacherForm {
                name,
                subject,
                classes,
                available_slots: slots,
            }
            .into_new_teacher()?;

            let mut roster = Roster::load(registry.as_ref())?;
            let registration = roster.register(new_teacher)?;
            roster.save(registry.as_ref())?;

            println!(
                "Registered {} (id {}, {})",
                registration.teacher.name, registration.teacher.id, registration.teacher.subject
            );
            if !registration.overlaps.is_empty() {
                let ids: Vec<String> = registration.overlaps.iter().map(|id| id.to_string()).collect();
                println!(
                    "⚠️  Subject already taught in the selected classes by teachers {}; they keep priority.",
                    ids.join(", ")
                );
            }
        }

        Commands::List => {
            let roster = Roster::load(registry.as_ref())?;
            for t in roster.teachers() {
                let classes: Vec<String> = t.classes.iter().map(|c| c.to_string()).collect();
                println!(
                    "{:>4}  {}  {}  [{}]  slots: {}",
                    t.id,
                    t.name,
                    t.subject,
                    classes.join(", "),
                    t.available_slots.len()
                );
            }
        }

        Commands::Generate {
            class,
            subject,
            output,
            csv,
        } => {
            let filter = GridFilter {
                class: class.as_deref().map(str::parse::<SchoolClass>).transpose()?,
                subject: subject.as_deref().map(str::parse::<Subject>).transpose()?,
            };
            if let Some(output) = output {
                config.output_path = output;
            }

            let roster = Roster::load(registry.as_ref())?;
            let generation = generate_week(roster.teachers());
            print_generation(&generation, roster.teachers(), filter);

            write_timetable_to_file("Расписание", &generation.timetable, roster.teachers(), filter, &config.output_path)?;
            println!("\nTimetable saved to {}", config.output_path.display());

            if let Some(csv_path) = csv {
                export_timetable_to_csv(&generation.timetable, roster.teachers(), &csv_path)?;
                println!("Assignments exported to {}", csv_path.display());
            }
        }

        Commands::Web { port } => {
            let port = port.unwrap_or(config.port);
            info!(port, registry = %config.registry_path.display(), "starting web server");
            let state = AppState::new(registry, config.admin_password.clone())?;
            start_server(port, state).await?;
        }
    }

    Ok(())
}
