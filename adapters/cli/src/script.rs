//! Line-based command scripts replayed against a session.

use std::time::Duration;

use nightfield_core::{CellCoord, WeaponKind};
use thiserror::Error;

/// Script played when no file is provided.
pub(crate) const DEMO: &str = "\
# dawn: spend the only seed
click 4 4
advance
# day: harvest it for two seeds
click 4 4
advance
weapon spray
wait-night 50
# second dawn: plant both seeds and wake the survivors
click 2 2
click 6 6
retarget
advance
advance
click 0 0
wait-night 50
retarget
";

/// Single instruction of a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Activates the tile at the coordinate.
    Click(CellCoord),
    /// Requests the next phase.
    Advance,
    /// Advances the simulation once.
    Tick(Duration),
    /// Ticks with the given frame length until the night is over.
    WaitNight(Duration),
    /// Arms or disarms the night weapon.
    Weapon(Option<WeaponKind>),
    /// Sends idle enemies after the nearest plant.
    Retarget,
}

/// Problems found while parsing a script.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ScriptError {
    #[error("line {line}: unknown directive `{directive}`")]
    UnknownDirective { line: usize, directive: String },
    #[error("line {line}: `{directive}` expects {expected} argument(s)")]
    Arity {
        line: usize,
        directive: &'static str,
        expected: usize,
    },
    #[error("line {line}: `{value}` is not a non-negative integer")]
    InvalidNumber { line: usize, value: String },
    #[error("line {line}: unknown weapon `{value}`")]
    UnknownWeapon { line: usize, value: String },
    #[error("line {line}: frame length must be positive")]
    ZeroFrame { line: usize },
}

/// Parses a whole script. Blank lines and `#` comments are skipped.
pub(crate) fn parse(source: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let mut words = content.split_whitespace();
        let directive = words.next().unwrap_or_default();
        let arguments: Vec<&str> = words.collect();
        steps.push(parse_step(line, directive, &arguments)?);
    }
    Ok(steps)
}

fn parse_step(line: usize, directive: &str, arguments: &[&str]) -> Result<Step, ScriptError> {
    match directive {
        "click" => {
            let [column, row] = expect_arguments::<2>(line, "click", arguments)?;
            Ok(Step::Click(CellCoord::new(
                number(line, column)?,
                number(line, row)?,
            )))
        }
        "advance" => {
            let [] = expect_arguments::<0>(line, "advance", arguments)?;
            Ok(Step::Advance)
        }
        "tick" => {
            let [millis] = expect_arguments::<1>(line, "tick", arguments)?;
            Ok(Step::Tick(frame(line, millis)?))
        }
        "wait-night" => {
            let [millis] = expect_arguments::<1>(line, "wait-night", arguments)?;
            Ok(Step::WaitNight(frame(line, millis)?))
        }
        "weapon" => {
            let [name] = expect_arguments::<1>(line, "weapon", arguments)?;
            let weapon = match name {
                "spray" => Some(WeaponKind::Spray),
                "none" => None,
                other => {
                    return Err(ScriptError::UnknownWeapon {
                        line,
                        value: other.to_owned(),
                    })
                }
            };
            Ok(Step::Weapon(weapon))
        }
        "retarget" => {
            let [] = expect_arguments::<0>(line, "retarget", arguments)?;
            Ok(Step::Retarget)
        }
        other => Err(ScriptError::UnknownDirective {
            line,
            directive: other.to_owned(),
        }),
    }
}

fn expect_arguments<'a, const N: usize>(
    line: usize,
    directive: &'static str,
    arguments: &[&'a str],
) -> Result<[&'a str; N], ScriptError> {
    <[&str; N]>::try_from(arguments).map_err(|_| ScriptError::Arity {
        line,
        directive,
        expected: N,
    })
}

fn number(line: usize, value: &str) -> Result<u32, ScriptError> {
    value.parse().map_err(|_| ScriptError::InvalidNumber {
        line,
        value: value.to_owned(),
    })
}

fn frame(line: usize, millis: &str) -> Result<Duration, ScriptError> {
    let millis = number(line, millis)?;
    if millis == 0 {
        return Err(ScriptError::ZeroFrame { line });
    }
    Ok(Duration::from_millis(u64::from(millis)))
}
