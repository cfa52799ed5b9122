use clap::{Parser, Subcommand};
use colored::Colorize;
use console::{
    api::ApiClient,
    app::Console,
    form::CustomerForm,
    prompt::{Prompter, TerminalPrompter},
    render::{render_cards, render_messages},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Record service base URL
    #[clap(long, env = "API_BASE_URL", default_value = "http://localhost:3000")]
    api_base: String,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show customer cards and refill alerts
    List {
        /// Only customers whose name or phone contains this
        #[clap(long)]
        filter: Option<String>,
    },

    /// Add a customer
    Add,

    /// Edit the customer with this phone
    Edit { phone: String },

    /// Delete every customer with this phone
    Delete { phone: String },

    /// Show refill alerts only
    Reminders,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut console = Console::new(ApiClient::new(cli.api_base), TerminalPrompter::stdio());

    let messages = console.load().await;

    match cli.command {
        Commands::List { filter } => {
            let query = filter.unwrap_or_default();
            print!("{}", render_cards(console.state().filter(&query)));
            print_messages(&messages);
        }
        Commands::Reminders => print_messages(&messages),
        Commands::Add => {
            println!("{}", "Add New User".bold());
            let mut form = console.state_mut().begin_add();
            form.fill(console.prompter());
            submit(&mut console, &form).await;
        }
        Commands::Edit { phone } => {
            let Some(mut form) = console.state_mut().begin_edit(&phone) else {
                console
                    .prompter()
                    .alert(&format!("No customer with phone {phone}."));
                return Ok(());
            };
            println!("{}", "Edit User".bold());
            form.fill(console.prompter());
            submit(&mut console, &form).await;
        }
        Commands::Delete { phone } => {
            console.delete(&phone).await;
            print!("{}", render_cards(console.state().customers()));
        }
    }

    Ok(())
}

async fn submit<P: Prompter>(console: &mut Console<P>, form: &CustomerForm) {
    if console.submit(form).await {
        println!("{}", "Saved.".green());
    }
    print!("{}", render_cards(console.state().customers()));
}

fn print_messages(messages: &[String]) {
    println!("{}", "Refill alerts".bold());
    print!("{}", render_messages(messages));
}
