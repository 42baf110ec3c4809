//! Switch dispatch: framework switches first, then the application's.
//!
//! The parsed switches are split once into the special ones (help,
//! verbosity, logo) and the rest. Each half is then walked exactly once in
//! command-line order, so no switch can reach a handler twice.

use crate::args::Parameter;
use crate::output::Output;
use crate::types::Level;

/// Switches the framework handles itself. Matched case-sensitively.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecialSwitch {
    Help,
    Verbose,
    Quiet,
    NoLogo,
}

impl SpecialSwitch {
    pub fn recognize(name: &str) -> Option<Self> {
        match name {
            "/?" | "/h" | "/help" => Some(SpecialSwitch::Help),
            "/v" | "/verbose" => Some(SpecialSwitch::Verbose),
            "/q" | "/quiet" => Some(SpecialSwitch::Quiet),
            "/nologo" => Some(SpecialSwitch::NoLogo),
            _ => None,
        }
    }
}

/// Per-run flags driven by special switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunState {
    pub help_wanted: bool,
    pub show_logo: bool,
    pub logo_shown: bool,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            help_wanted: false,
            show_logo: true,
            logo_shown: false,
        }
    }
}

/// Switches split by who handles them, each half in command-line order.
#[derive(Debug, Default)]
pub struct Partition {
    pub special: Vec<(SpecialSwitch, Parameter)>,
    pub application: Vec<Parameter>,
}

pub fn partition(switches: Vec<Parameter>) -> Partition {
    let mut split = Partition::default();
    for param in switches {
        match param.name().and_then(SpecialSwitch::recognize) {
            Some(special) => split.special.push((special, param)),
            None => split.application.push(param),
        }
    }
    split
}

/// Apply framework switches to the run state and the output filter.
pub fn apply_special(
    switches: &mut [(SpecialSwitch, Parameter)],
    state: &mut RunState,
    output: &mut Output,
) {
    for (special, param) in switches.iter_mut() {
        if !param.values().is_empty() {
            tracing::debug!(switch = ?param.name(), values = ?param.values(), "ignoring values of special switch");
        }
        match special {
            SpecialSwitch::Help => state.help_wanted = true,
            SpecialSwitch::Verbose => output.set_show_level(Level::Verbose),
            SpecialSwitch::Quiet => output.set_show_level(Level::Warning),
            SpecialSwitch::NoLogo => state.show_logo = false,
        }
        let fresh = param.mark_applied();
        debug_assert!(fresh, "special switch applied twice");
    }
}

/// Hand every application switch to `hook` once, in order.
///
/// A switch counts as applied only after the hook accepted it; the first
/// rejection stops the walk.
pub fn apply_switches<F>(switches: &mut [Parameter], mut hook: F) -> anyhow::Result<()>
where
    F: FnMut(&str, &[String]) -> anyhow::Result<()>,
{
    for param in switches.iter_mut().filter(|param| !param.applied()) {
        let name = param.name().unwrap_or_default();
        tracing::trace!(switch = name, "dispatching application switch");
        hook(name, param.values())?;
        let fresh = param.mark_applied();
        debug_assert!(fresh, "switch handed to the application twice");
    }
    Ok(())
}
