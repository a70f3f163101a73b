//! `geobridge capabilities`: list the required capability set.

use geobridge::permission::CapabilitySet;

use crate::error::CliError;

/// Print the required capabilities in request order.
pub fn run() -> Result<(), CliError> {
    let required = CapabilitySet::required();

    println!("Required capabilities (request order)");
    println!("=====================================");
    for (index, capability) in required.iter().enumerate() {
        println!(
            "{:>2}. {:<24} {}",
            index + 1,
            capability.id(),
            capability.android_permission()
        );
    }
    println!();
    println!("The first capability refused in the grant dialog is the one reported.");

    Ok(())
}
