use ai_chef::{build_controller, ChefConfig, ChefError, Directive, FormInput, TerminalPresenter};
use clap::Parser;
use log::debug;
use std::io::{self, Write};
use tokio::io::{stdin, AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

const TITLE: &str = "🧑‍🍳 AI Chef Recipe Generator";
const INTRO: &str =
    "Tell me the ingredients you have, and the AI chef will put together the best recipe for you!";
const BUSY_MESSAGE: &str = "The AI chef is cooking up your recipe... please wait a moment!";

#[derive(Parser)]
#[command(name = "ai-chef")]
#[command(about = "Generate a recipe from the ingredients you have")]
struct Args {
    /// Main ingredient (runs once without asking questions)
    #[arg(short, long)]
    main: Option<String>,

    /// Other ingredients, comma separated
    #[arg(short, long, default_value = "")]
    sub: String,

    /// Prefer low-calorie, healthy preparations
    #[arg(short, long)]
    diet: bool,

    /// Override the provider from configuration
    #[arg(short, long)]
    provider: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // .env is optional; GOOGLE_API_KEY usually lives there
    dotenvy::dotenv().ok();

    let default_filter = if args.verbose { "debug" } else { "off" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = match ChefConfig::load() {
        Ok(config) => config,
        Err(e) => fail_startup(ChefError::from(e)),
    };
    if let Some(provider) = args.provider {
        config.default_provider = provider;
    }

    let mut controller = match build_controller(&config) {
        Ok(controller) => controller,
        Err(e) => fail_startup(e),
    };
    debug!("Controller ready with provider '{}'", controller.provider_name());

    let mut presenter = TerminalPresenter::new(io::stdout());

    if let Some(main_ingredient) = args.main {
        let input = FormInput::new(main_ingredient, args.sub, args.diet);
        let directives = submit(&mut controller, input).await;
        presenter.present(&directives)?;
        return Ok(());
    }

    println!("{}\n{}\n", TITLE, INTRO);
    let mut form = Form::new();

    loop {
        let Some(input) = form.read_input().await? else {
            break;
        };
        let directives = submit(&mut controller, input).await;
        presenter.present(&directives)?;

        match form.ask("\nMake another recipe? [y/N]").await? {
            Some(answer) if is_yes(&answer) => println!(),
            _ => break,
        }
    }

    Ok(())
}

async fn submit(
    controller: &mut ai_chef::InteractionController,
    input: FormInput,
) -> Vec<Directive> {
    if input.has_main_ingredient() {
        eprintln!("{}", BUSY_MESSAGE);
    }
    controller.submit(input).await
}

fn fail_startup(err: ChefError) -> ! {
    eprintln!("Failed to set up the AI provider: {}", err);
    std::process::exit(1);
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Line-based stand-in for the form fields
struct Form<R> {
    lines: Lines<R>,
}

impl Form<BufReader<Stdin>> {
    fn new() -> Self {
        Form::from_reader(BufReader::new(stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Form<R> {
    fn from_reader(reader: R) -> Self {
        Form {
            lines: reader.lines(),
        }
    }

    async fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        print!("{} ", question);
        io::stdout().flush()?;
        self.lines.next_line().await
    }

    /// `None` once stdin is closed
    async fn read_input(&mut self) -> io::Result<Option<FormInput>> {
        let Some(main_ingredient) = self
            .ask("What is your main ingredient? (e.g. chicken, tofu, eggs)")
            .await?
        else {
            return Ok(None);
        };
        let sub_ingredients = self
            .ask("Any other ingredients? Separate them with commas. (e.g. soy sauce, garlic, onion)")
            .await?
            .unwrap_or_default();
        let diet_mode = self
            .ask("💪 Diet mode? Low-calorie, healthy recipes [y/N]")
            .await?
            .map(|answer| is_yes(&answer))
            .unwrap_or(false);

        // Only the main ingredient is trimmed; other ingredients go into the prompt as typed
        Ok(Some(FormInput::new(
            main_ingredient.trim(),
            sub_ingredients,
            diet_mode,
        )))
    }
}
