//! admixcalc-rs: prepare the sample, population and parameter files of a DIY admixture calculator.

use parser::{Cli, Commands::*};
use located_error::LocatedError;

use anyhow::Result;
use log::{info, warn};

/// Run the subcommand held by `cli`.
///
/// # Errors
/// Any error raised while running the subcommand, carrying the context of every stage it went through.
pub fn run(cli: Cli) -> Result<()> {
    match cli.commands {
        Create{common, create} => {
            let summary = create_calc::run(&common, &create)?;
            info!("Calculator '{}': {} individual(s) sampled, {} line(s) kept, components: [{}]",
                summary.calc_name, summary.sampled, summary.projection.kept, summary.components.join(", ")
            );
        },

        ConvertfPar{common, convertf} => {
            if let Some(par) = create_calc::params::write_convertf_par(&common, &convertf)? {
                info!("Run 'convertf -p {}' to convert the reference dataset", par.display());
            }
        },

        CalcPar{common, par} => {
            create_calc::params::write_calc_par(&common, &par)?;
        },

        CalcFiles{common, files} => {
            create_calc::params::write_calc_files(&common, &files)?;
        },

        FromYaml{yaml} => {
            let cli = Cli::deserialize(&yaml)?;
            if matches!(cli.commands, FromYaml{..}) {
                warn!("{} points to yet another yaml file.", yaml.display());
            }
            self::run(cli).with_loc(|| format!("While running arguments from '{}'", yaml.display()))?;
        },
    };
    Ok(())
}
