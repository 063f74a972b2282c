use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{auth::hash_password, customers, users};
use migration::MigratorTrait;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

/// Shortest password the sign-in form accepts.
const MIN_PASSWORD_LEN: usize = 6;

type AdminResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "invoicer_admin")]
#[command(about = "Admin utilities for Invoicer (bootstrap users and customers)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./invoicer.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Customer(Customer),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Creates a dashboard user, prompting for the password.
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct Customer {
    #[command(subcommand)]
    command: CustomerCommand,
}

#[derive(Subcommand, Debug)]
enum CustomerCommand {
    Create(CustomerCreateArgs),
}

#[derive(Args, Debug)]
struct CustomerCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    image_url: Option<String>,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> AdminResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn notice(message: &str) -> AdminResult<()> {
    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(message),
        Print("\r\n")
    )?;
    Ok(())
}

/// Reads a line without echoing it, printing `*` per character.
fn read_secret(prompt: &str) -> AdminResult<String> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut secret = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => break,
            KeyCode::Backspace if secret.pop().is_some() => {
                execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                secret.push(ch);
                execute!(out, Print("*"))?;
            }
            _ => continue,
        }
        out.flush()?;
    }

    execute!(out, Print("\r\n"))?;
    Ok(secret)
}

fn ask_new_password() -> AdminResult<String> {
    for _ in 0..3 {
        let first = read_secret("Password: ")?;
        if first.chars().count() < MIN_PASSWORD_LEN {
            notice(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters."
            ))?;
            continue;
        }

        if read_secret("Confirm password: ")? == first {
            return Ok(first);
        }
        notice("Passwords do not match. Try again.")?;
    }

    Err("too many attempts".into())
}

async fn connect_db(database_url: &str) -> AdminResult<DatabaseConnection> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn create_user(db: &DatabaseConnection, args: UserCreateArgs) -> AdminResult<()> {
    let existing = users::Entity::find()
        .filter(users::Column::Email.eq(args.email.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(format!("user already exists: {}", args.email).into());
    }

    let password = ask_new_password()?;
    let user = users::ActiveModel {
        id: NotSet,
        name: Set(args.name),
        email: Set(args.email.clone()),
        password: Set(hash_password(&password)?),
    };
    users::Entity::insert(user).exec_without_returning(db).await?;

    println!("created user: {}", args.email);
    Ok(())
}

async fn create_customer(db: &DatabaseConnection, args: CustomerCreateArgs) -> AdminResult<()> {
    let customer = customers::ActiveModel {
        id: NotSet,
        name: Set(args.name.clone()),
        email: Set(args.email),
        image_url: Set(args.image_url),
    };
    customers::Entity::insert(customer)
        .exec_without_returning(db)
        .await?;

    println!("created customer: {}", args.name);
    Ok(())
}

#[tokio::main]
async fn main() -> AdminResult<()> {
    let cli = Cli::parse();
    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => create_user(&db, args).await,
        Command::Customer(Customer {
            command: CustomerCommand::Create(args),
        }) => create_customer(&db, args).await,
    }
}
