use clap::{Parser, Subcommand};

use crate::{
    api::octopus::Api,
    core::{catalog::Direction, source::CatalogSource},
    prelude::*,
    tables::build_products_table,
};

#[derive(Parser)]
pub struct BurrowArgs {
    #[command(subcommand)]
    command: BurrowCommand,
}

impl BurrowArgs {
    pub async fn run(self) -> Result {
        match self.command {
            BurrowCommand::Products(args) => args.run().await,
        }
    }
}

#[derive(Subcommand)]
pub enum BurrowCommand {
    /// List the import products available to households.
    Products(BurrowProductsArgs),
}

#[derive(Parser)]
pub struct BurrowProductsArgs {
    #[clap(long = "octopus-api-key", env = "OCTOPUS_API_KEY")]
    api_key: String,
}

impl BurrowProductsArgs {
    async fn run(self) -> Result {
        let mut products = Api::try_new(self.api_key)?.get_products().await?;
        products.retain(|product| product.direction == Direction::Import);
        products.sort_by(|lhs, rhs| lhs.display_name.cmp(&rhs.display_name));
        println!("{}", build_products_table(&products));
        Ok(())
    }
}
