use std::io::Write;

use super::Verdict;
use crate::config::GateConfig;

/// Write the confirmation lines for an allowed commit.
///
/// A denied commit writes nothing; the failing step's own output is all the
/// developer sees.
pub fn report(verdict: &Verdict, gate: &GateConfig, out: &mut impl Write) -> std::io::Result<()> {
    if verdict.is_allow() {
        for line in &gate.success {
            writeln!(out, "{line}")?;
        }
        out.flush()?;
    }
    Ok(())
}
