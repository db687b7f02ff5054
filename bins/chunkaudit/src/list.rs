use chunkaudit_db::localstore::schema::Fields;
use chunkaudit_db::localstore::{PRIMARY_INDEX, SECONDARY_INDEXES};
use clap::Args as ClapArgs;

#[derive(Debug, ClapArgs)]
pub struct Command {}

pub fn run(_cmd: &Command) {
    println!("Indexes:");
    for codec in std::iter::once(PRIMARY_INDEX).chain(SECONDARY_INDEXES) {
        println!(
            "  {:<20} {:<30} {}",
            codec.name(),
            codec.cf_name(),
            codec.layout()
        );
    }
    println!("Fields:");
    for field in Fields::ALL {
        println!("  {}", field);
    }
}
