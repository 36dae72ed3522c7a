use chrono::NaiveDate;
use clap::{command, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    #[arg(short, long)]
    pub configuration_file: Option<String>,
    #[arg(short, long)]
    pub verbosity: Option<log::LevelFilter>,
}

#[derive(Subcommand)]
pub enum Command {
    /// logs in and opens the action menu; omitted credentials fall back to the remembered ones
    Login {
        username: Option<String>,
        password: Option<String>,
        /// remembers the credentials for the next login
        #[arg(short, long)]
        remember: bool,
    },
    /// clears the local session
    Logout,
    /// shows the actions available to the current session
    Menu,
    /// runs a diagnostic on the session
    SessionDiagnostic {
        /// show the token
        show_token: Option<bool>,
    },
    /// registers a new account
    RegisterAccount {
        #[arg(long)]
        username: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// birth date, ISO format (1990-04-02)
        #[arg(long)]
        birth_date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value_t = 0)]
        zip_code: u32,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone_number: String,
        #[arg(long)]
        password: String,
        /// requests administrator privileges for the new account
        #[arg(long)]
        admin: bool,
    },
    /// product operations
    Product {
        #[command(subcommand)]
        command: ProductCommand,
    },
    /// category operations
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
}

#[derive(Subcommand)]
pub enum ProductCommand {
    /// searches by name or looks a product up by SKU
    Search {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        sku: Option<String>,
    },
    /// registers a new product
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        sku: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        image_url: String,
        #[arg(long)]
        price: f64,
    },
    /// updates an existing product; omitted fields keep their current value
    Update {
        sku: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        price: Option<f64>,
    },
    /// deletes a product
    Delete { sku: String },
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// lists all categories with their product counts
    List,
    /// creates a new category
    Create { name: String },
    /// puts the product with the given SKU into a category
    Assign { category_id: i64, sku: String },
}
