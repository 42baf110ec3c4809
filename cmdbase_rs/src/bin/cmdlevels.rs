//! cmdlevels - writes one line per output level. Try it with /v and /q.

use std::process::ExitCode;

use cmdbase::cli::{Application, Context, exit_code, run_main};
use cmdbase::colors::Color;
use cmdbase::error::InitError;
use cmdbase::messages::{Catalog, MessageProvider};
use cmdbase::types::{EXIT_UNHANDLED, Level};

const CATALOG: &str = include_str!("../../messages/levels.toml");

struct Levels {
    catalog: Catalog,
}

impl Application for Levels {
    fn catalog(&self) -> Box<dyn MessageProvider> {
        Box::new(self.catalog.clone())
    }

    fn run(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
        for level in Level::ALL {
            ctx.message(level, "levels.line", &[level.tag()]);
        }
        let colored = ctx.messages().get("levels.colored").to_string();
        ctx.write_colored(Level::Normal, Color::BrightGreen, Color::Blue, &colored);
        Ok(())
    }
}

fn main() -> ExitCode {
    match Catalog::from_toml_str(CATALOG) {
        Ok(catalog) => run_main(Levels { catalog }),
        Err(err) => {
            eprintln!("fatal: {}", InitError::from(err));
            exit_code(EXIT_UNHANDLED)
        }
    }
}
