use clap::Subcommand;
use lil_common::cache::IssueCache;
use lil_common::config::Config;
use lil_common::error::Result;

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Print the cache file location and age
    Path,
    /// Delete the cached issues
    Clear,
}

impl CacheCommand {
    pub fn run(&self, config: &Config) -> Result<()> {
        let cache = IssueCache::from_config(config);
        match self {
            Self::Path => {
                match cache.age()? {
                    Some(age) => println!(
                        "{} (updated {} ago)",
                        cache.path().display(),
                        humantime::format_duration(std::time::Duration::from_secs(age.as_secs()))
                    ),
                    None => println!("{} (not created yet)", cache.path().display()),
                }
                Ok(())
            }
            Self::Clear => {
                cache.clear()?;
                println!("Cleared {}", cache.path().display());
                Ok(())
            }
        }
    }
}
