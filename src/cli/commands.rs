use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use console::{style, Emoji};
use dialoguer::{theme::ColorfulTheme, Input};
use tracing::{error, info};

use crate::{
    cli::args::Commands,
    database::{
        repositories::{SqliteStorageRepository, StorageRepository},
        Database,
    },
    services::{CartService, CatalogService},
    utils::{
        formatting::{format_date, format_price, format_product_table, format_total},
        parse_price, Config,
    },
    views::{CartView, HtmlPageView, RenderOutcome, TerminalView},
};

static CHECKMARK: Emoji<'_, '_> = Emoji("✅ ", "");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️ ", "");
static INFO: Emoji<'_, '_> = Emoji("ℹ️ ", "");
static CART: Emoji<'_, '_> = Emoji("🛒 ", "");

pub struct CliApp {
    database: Database,
    storage: Arc<dyn StorageRepository>,
    page: Option<PathBuf>,
}

impl CliApp {
    pub async fn new(config: &Config) -> Result<Self> {
        let database = Database::from_url(&config.database_url)
            .await
            .context("Failed to initialize cart storage")?;
        database.migrate().await?;

        if !database.health_check().await? {
            return Err(anyhow::anyhow!("Cart storage health check failed"));
        }

        let storage: Arc<dyn StorageRepository> =
            Arc::new(SqliteStorageRepository::new(database.pool().clone()));

        Ok(Self {
            database,
            storage,
            page: config.page.clone(),
        })
    }

    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Add { name, price } => self.handle_add(name, price).await,
            Commands::Buy { product } => self.handle_buy(product).await,
            Commands::Products => self.handle_products().await,
            Commands::Show => self.handle_show().await,
            Commands::Total => self.handle_total().await,
            Commands::Render { output } => self.handle_render(output).await,
        }
    }

    pub async fn close(&self) -> Result<()> {
        self.database.close().await
    }

    fn view(&self, output: Option<PathBuf>) -> Arc<dyn CartView> {
        match &self.page {
            Some(page) => {
                let view = HtmlPageView::new(page);
                match output {
                    Some(output) => Arc::new(view.with_output(output)),
                    None => Arc::new(view),
                }
            }
            None => Arc::new(TerminalView::new()),
        }
    }

    async fn load_cart(&self, output: Option<PathBuf>) -> Result<CartService> {
        CartService::load(self.storage.clone(), self.view(output))
            .await
            .context("Failed to load cart")
    }

    fn require_page(&self) -> Result<&PathBuf> {
        match &self.page {
            Some(page) => Ok(page),
            None => {
                println!(
                    "{} This command needs a page: pass {} or set {}",
                    WARNING,
                    style("--page <FILE>").cyan(),
                    style("CART_PAGE").cyan()
                );
                Err(anyhow::anyhow!("No page configured"))
            }
        }
    }

    async fn handle_add(&self, name: Option<String>, price: Option<String>) -> Result<()> {
        let theme = ColorfulTheme::default();

        let name = match name {
            Some(name) => name,
            None => Input::with_theme(&theme)
                .with_prompt("Item")
                .validate_with(|input: &String| -> Result<(), &str> {
                    if input.trim().is_empty() {
                        Err("Item name is required")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()?,
        };

        let price_text = match price {
            Some(price) => price,
            None => Input::with_theme(&theme)
                .with_prompt("Price (€)")
                .validate_with(|input: &String| -> Result<(), String> {
                    parse_price(input).map(|_| ()).map_err(|e| e.to_string())
                })
                .interact_text()?,
        };

        let price = match parse_price(&price_text) {
            Ok(price) => price,
            Err(e) => {
                println!("{} {}", CROSS, style(&e).red());
                error!("Failed to add item: {}", e);
                return Err(e.into());
            }
        };

        self.add_to_cart(&name, price).await
    }

    async fn handle_buy(&self, product: String) -> Result<()> {
        let page = self.require_page()?;

        match CatalogService::find(page, &product) {
            Ok(product) => self.add_to_cart(&product.name, product.price).await,
            Err(e) => {
                println!("{} {}", CROSS, style(&e).red());
                error!("Failed to pick product '{}': {}", product, e);
                Err(e.into())
            }
        }
    }

    async fn add_to_cart(&self, name: &str, price: f64) -> Result<()> {
        let mut service = self.load_cart(None).await?;

        match service.add_item(name, price).await {
            Ok(line) => {
                println!(
                    "{} Added {} ({} x{})",
                    CHECKMARK,
                    style(&line.name).green(),
                    format_price(line.price),
                    line.quantity
                );
                if let Some(page) = &self.page {
                    println!("{} Cart summary updated in {}", INFO, style(page.display()).cyan());
                }
                info!("Item added: {}", line.name);
            }
            Err(e) => {
                println!("{} Failed to add item: {}", CROSS, style(&e).red());
                error!("Failed to add item: {}", e);
                return Err(e.into());
            }
        }

        Ok(())
    }

    async fn handle_products(&self) -> Result<()> {
        let page = self.require_page()?;

        match CatalogService::products(page) {
            Ok(products) if products.is_empty() => {
                println!("{} No products found on {}", INFO, page.display());
            }
            Ok(products) => {
                println!(
                    "{} {}",
                    INFO,
                    style(format!("Found {} products", products.len())).bold()
                );
                println!("{}", format_product_table(&products));
            }
            Err(e) => {
                println!("{} Failed to read products: {}", CROSS, style(&e).red());
                error!("Failed to read products: {}", e);
                return Err(e.into());
            }
        }

        Ok(())
    }

    async fn handle_show(&self) -> Result<()> {
        let service = self.load_cart(None).await?;

        println!("{} {}", CART, style("Cart").bold().cyan());
        self.report_render(service.render())?;

        if let Some(saved_at) = service.last_saved_at() {
            println!("{}", style(format!("Last saved: {}", format_date(&saved_at))).dim());
        }

        Ok(())
    }

    async fn handle_total(&self) -> Result<()> {
        let service = self.load_cart(None).await?;
        println!("{}", format_total(service.get_total()));
        Ok(())
    }

    async fn handle_render(&self, output: Option<PathBuf>) -> Result<()> {
        self.require_page()?;

        let service = self.load_cart(output).await?;
        self.report_render(service.render())
    }

    fn report_render<E>(&self, result: std::result::Result<RenderOutcome, E>) -> Result<()>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match (result, &self.page) {
            (Ok(RenderOutcome::Rendered), Some(page)) => {
                println!("{} Cart summary written for {}", CHECKMARK, style(page.display()).cyan());
            }
            (Ok(RenderOutcome::Rendered), None) => {}
            (Ok(RenderOutcome::AnchorMissing), _) => {
                println!("{} No cart summary found on the page, nothing rendered", WARNING);
            }
            (Err(e), _) => {
                println!("{} Failed to render cart: {}", CROSS, style(&e).red());
                error!("Failed to render cart: {}", e);
                return Err(e.into());
            }
        }
        Ok(())
    }
}
