use crate::modules::system::package_managers::{InstallOutcome, RemoveOutcome};

pub fn print_install_outcome(name: &str, outcome: InstallOutcome) {
    match outcome {
        InstallOutcome::Installed { retried: false } => println!("✅ {name} installed"),
        InstallOutcome::Installed { retried: true } => {
            println!("✅ {name} installed (after refreshing the package index)")
        }
        InstallOutcome::Skipped => println!("⏭️  {name} is already installed"),
    }
}

pub fn print_remove_outcome(name: &str, outcome: RemoveOutcome) {
    match outcome {
        RemoveOutcome::Removed => println!("🗑️  {name} removed"),
        RemoveOutcome::Skipped => println!("⏭️  {name} is not installed"),
    }
}

pub fn print_existence(name: &str, installed: bool) {
    if installed {
        println!("✅ {name} is installed");
    } else {
        println!("❌ {name} is not installed");
    }
}
