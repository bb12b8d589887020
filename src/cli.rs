use std::path::PathBuf;

mod terminal;

use clap::ArgAction;
use lending::{
    domain::validate, storage::CONFIG_FILE, Config, Role, Status as TxStatus, Store, Transaction,
};
use terminal::Colorize;
use tracing::instrument;

/// Parse a quantity argument at the CLI boundary.
///
/// Keeps the validation message of the domain validator while letting clap
/// hand the ledger a proven non-negative integer.
fn parse_quantity(s: &str) -> Result<u32, String> {
    validate::require_int_ge_0(s, "quantity").map_err(|e| e.to_string())
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the data directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show collection counts and overdue totals (default)
    Status(Status),

    /// Initialize a new data directory
    Init,

    /// Classify an email address as student or staff
    Role(RoleCmd),

    /// Log in by email; students are registered on first login
    Login(Login),

    /// Add a student with an explicit ID
    AddStudent(AddStudent),

    /// Add a resource to the inventory
    AddResource(AddResource),

    /// Overwrite a resource's available quantity
    UpdateQuantity(UpdateQuantity),

    /// Remove a resource that has no units out on loan
    RemoveResource(RemoveResource),

    /// List resources
    Resources(Resources),

    /// Borrow one unit of a resource for a student
    Borrow(Borrow),

    /// Return a borrowed unit
    Return(Return),

    /// List transactions
    Transactions(Transactions),

    /// List overdue transactions
    Overdue(Overdue),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(root)?,
            Self::Init => Init::run(&root)?,
            Self::Role(command) => command.run(root)?,
            Self::Login(command) => command.run(root)?,
            Self::AddStudent(command) => command.run(root)?,
            Self::AddResource(command) => command.run(root)?,
            Self::UpdateQuantity(command) => command.run(root)?,
            Self::RemoveResource(command) => command.run(root)?,
            Self::Resources(command) => command.run(root)?,
            Self::Borrow(command) => command.run(root)?,
            Self::Return(command) => command.run(root)?,
            Self::Transactions(command) => command.run(root)?,
            Self::Overdue(command) => command.run(root)?,
        }
        Ok(())
    }
}

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Default, clap::Parser)]
#[command(about = "Show collection counts and overdue totals")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

impl Status {
    #[instrument(level = "debug", skip(self))]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = Store::open(root)?;
        let ledger = store.ledger();

        let students = ledger.students().len();
        let resources = ledger.resources().len();
        let transactions = ledger.transactions().len();
        let active = ledger
            .transactions()
            .iter()
            .filter(|t| t.status == TxStatus::Borrowed)
            .count();
        let overdue = ledger.list_overdue(None)?.len();

        match self.output {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "students": students,
                    "resources": resources,
                    "transactions": transactions,
                    "active_borrows": active,
                    "overdue": overdue,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                if self.quiet {
                    println!(
                        "students={students} resources={resources} \
                         transactions={transactions} active={active} overdue={overdue}"
                    );
                } else {
                    println!("Lending ledger");
                    println!("{}", "──────────────".dim());
                    println!("{:<14} {students}", "Students");
                    println!("{:<14} {resources}", "Resources");
                    println!("{:<14} {transactions}", "Transactions");
                    println!("{:<14} {active}", "Out on loan");
                    if overdue > 0 {
                        println!("{:<14} {}", "Overdue", overdue.to_string().warning());
                    } else {
                        println!("{:<14} 0", "Overdue");
                    }
                }
            }
        }

        // Exit nonzero when something needs chasing, for scripts and CI.
        if overdue > 0 {
            std::process::exit(2);
        }

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &PathBuf) -> anyhow::Result<()> {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            anyhow::bail!(
                "Data directory already initialized (found existing {})",
                config_path.display()
            );
        }

        std::fs::create_dir_all(root)
            .map_err(|e| anyhow::anyhow!("Failed to create data directory: {e}"))?;

        let config = Config::default();
        config
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {CONFIG_FILE}: {e}"))?;

        // Opening the store creates the empty collection files.
        Store::open(root.clone())?;

        println!("Initialized lending data directory in {}", root.display());
        println!("  Created: {CONFIG_FILE}");
        println!("  Created: students.json, resources.json, transactions.json");
        println!();
        println!("Next steps:");
        println!("  lend add-resource R1 \"Projector\" AV 3");
        println!("  lend login someone@alustudent.com --name \"Their Name\"");

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct RoleCmd {
    /// The email address to classify
    email: String,
}

impl RoleCmd {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = Store::open(root)?;
        let role = store.ledger().determine_role(&self.email)?;
        println!("{role}");
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Login {
    /// Campus email address
    email: String,

    /// Full name, required the first time a student logs in
    #[arg(long, short)]
    name: Option<String>,
}

impl Login {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = Store::open(root)?;
        let role = store.ledger().determine_role(&self.email)?;

        match role {
            Role::Staff => {
                println!("{}", "Role detected: STAFF".info());
            }
            Role::Student => {
                println!("{}", "Role detected: STUDENT".info());
                let email = self.email.trim().to_lowercase();

                if let Some(student) = store.ledger().find_student_by_email(&email) {
                    println!("Welcome back, {}!", student.name);
                    println!("Your student ID is {}", student.student_id);
                    return Ok(());
                }

                let Some(name) = self.name else {
                    anyhow::bail!(
                        "First login for {email}: pass --name to create the account"
                    );
                };
                let student = store.register_student(&name, &email)?;
                println!(
                    "{}",
                    format!("Account created. Your student ID is {}", student.student_id)
                        .success()
                );
            }
        }

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct AddStudent {
    /// Student ID (for self-registration use `login` instead)
    id: String,

    /// Full name
    name: String,

    /// Campus email address
    email: String,
}

impl AddStudent {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = Store::open(root)?;
        let student = store.add_student(&self.id, &self.name, &self.email)?;
        println!("Added student {} ({})", student.student_id, student.name);
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct AddResource {
    /// Resource ID
    id: String,

    /// Display name
    name: String,

    /// Type/category
    category: String,

    /// Number of units stocked
    #[arg(value_parser = parse_quantity)]
    quantity: u32,
}

impl AddResource {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = Store::open(root)?;
        let resource = store.add_resource(&self.id, &self.name, &self.category, self.quantity)?;
        println!(
            "Added resource {} ({}, {} units)",
            resource.resource_id, resource.name, resource.quantity
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct UpdateQuantity {
    /// Resource ID
    id: String,

    /// New available quantity
    #[arg(value_parser = parse_quantity)]
    quantity: u32,
}

impl UpdateQuantity {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = Store::open(root)?;
        store.update_resource_quantity(&self.id, self.quantity)?;
        println!("Set resource {} quantity to {}", self.id, self.quantity);
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct RemoveResource {
    /// Resource ID to remove
    id: String,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

impl RemoveResource {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = Store::open(root)?;

        if !self.yes {
            let proceed = dialoguer::Confirm::new()
                .with_prompt(format!("Remove resource '{}'?", self.id))
                .default(false)
                .interact()?;
            if !proceed {
                println!("Cancelled");
                return Ok(());
            }
        }

        store.remove_resource(&self.id)?;
        println!("{}", format!("Removed resource {}", self.id).success());
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Resources {
    /// Show only resources with at least one unit available
    #[arg(long)]
    available: bool,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Resources {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = Store::open(root)?;
        let resources = if self.available {
            store.ledger().list_available_resources()
        } else {
            store.ledger().list_resources()
        };

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&resources)?);
            }
            OutputFormat::Table => {
                if resources.is_empty() {
                    println!("No resources found.");
                    return Ok(());
                }
                println!(
                    "{:<12} {:<30} {:<20} {:<5}",
                    "ID", "NAME", "TYPE", "QTY"
                );
                println!("{}", "─".repeat(70).dim());
                for resource in &resources {
                    println!(
                        "{:<12} {:<30} {:<20} {:<5}",
                        resource.resource_id, resource.name, resource.category, resource.quantity
                    );
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Borrow {
    /// The borrowing student's ID
    student: String,

    /// The resource ID to borrow
    resource: String,

    /// Borrow date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    date: Option<String>,
}

impl Borrow {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = Store::open(root)?;
        let tx = store.borrow_resource(&self.student, &self.resource, self.date.as_deref())?;

        println!("{}", "Resource borrowed.".success());
        println!("  Transaction: {}", tx.transaction_id);
        println!("  Borrowed:    {}", tx.borrow_date);
        println!("  Due:         {}", tx.due_date);
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Return {
    /// Transaction ID to return
    #[arg(long, short, conflicts_with_all = ["student", "resource"])]
    transaction: Option<String>,

    /// Student ID, paired with --resource
    #[arg(long, requires = "resource")]
    student: Option<String>,

    /// Resource ID, paired with --student
    #[arg(long, requires = "student")]
    resource: Option<String>,

    /// Return date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    date: Option<String>,
}

impl Return {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = Store::open(root)?;

        let tx = if let Some(transaction_id) = &self.transaction {
            store.return_resource(transaction_id, self.date.as_deref())?
        } else if let (Some(student), Some(resource)) = (&self.student, &self.resource) {
            store.return_by_student_resource(student, resource, self.date.as_deref())?
        } else {
            anyhow::bail!("Pass --transaction, or --student together with --resource");
        };

        println!("{}", "Resource returned.".success());
        println!("  Transaction: {}", tx.transaction_id);
        if let Some(return_date) = tx.return_date {
            println!("  Returned:    {return_date}");
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Transactions {
    /// Show only this student's transactions
    #[arg(long)]
    student: Option<String>,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Transactions {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = Store::open(root)?;
        let transactions = store.ledger().list_transactions(self.student.as_deref())?;
        output_transactions(&transactions, self.output)
    }
}

#[derive(Debug, clap::Parser)]
pub struct Overdue {
    /// Reference date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    as_of: Option<String>,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Overdue {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = Store::open(root)?;
        let overdue = store.ledger().list_overdue(self.as_of.as_deref())?;
        output_transactions(&overdue, self.output)
    }
}

fn output_transactions(transactions: &[Transaction], output: OutputFormat) -> anyhow::Result<()> {
    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(transactions)?);
        }
        OutputFormat::Table => {
            if transactions.is_empty() {
                println!("No transactions found.");
                return Ok(());
            }
            println!(
                "{:<8} {:<8} {:<10} {:<12} {:<12} {:<12} {:<10}",
                "T_ID", "STUD_ID", "RES_ID", "BORROW", "DUE", "RETURN", "STATUS"
            );
            println!("{}", "─".repeat(75).dim());
            for t in transactions {
                let return_date = t
                    .return_date
                    .map_or_else(|| "-".to_string(), |d| d.to_string());
                println!(
                    "{:<8} {:<8} {:<10} {:<12} {:<12} {:<12} {:<10}",
                    t.transaction_id,
                    t.student_id,
                    t.resource_id,
                    t.borrow_date.to_string(),
                    t.due_date.to_string(),
                    return_date,
                    t.status.to_string(),
                );
            }
        }
    }
    Ok(())
}
