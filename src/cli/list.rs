use newsmill::config::Config;
use newsmill::data::DataStore;
use newsmill::resources::standard_registry;

use super::LocationsArgs;

pub fn locations(args: LocationsArgs) -> anyhow::Result<()> {
    let store = super::generate::load_store(args.data.as_deref(), &Config::default())?;
    for location in store.locations() {
        println!("{}", location);
    }
    println!("all");
    Ok(())
}

pub fn languages() -> anyhow::Result<()> {
    let registry = standard_registry()?;
    for language in registry.languages() {
        println!("{}", language);
    }
    Ok(())
}
