use super::CliCompanion;

/// Forgets cached vehicle data. Saved entries are kept.
pub struct LogoutCommand;

impl LogoutCommand {
    pub fn run(&self, companion: &mut CliCompanion) -> Result<(), Box<dyn std::error::Error>> {
        companion.logout()?;
        if let Some(reminder) = companion.pending_reminder() {
            println!("{}", reminder);
        }
        println!("Credentials in your config file are left in place.");
        Ok(())
    }
}
