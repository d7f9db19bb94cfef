//! Textual reports for component analyses.

use std::fmt::Write;

use crate::analysis::ComponentSummary;

/// Render a human-readable summary of a component analysis.
///
/// The report walks through the applied loads, the laminate response, the
/// effective constants and the per-ply margins so the numbers can be
/// cross-checked against hand calculations.
#[must_use]
pub fn render_summary(summary: &ComponentSummary) -> String {
    let mut output = String::new();

    writeln!(
        &mut output,
        "{} ({} criterion)",
        summary.name,
        summary.criterion.label()
    )
    .expect("writing to string cannot fail");

    writeln!(
        &mut output,
        "Load resultants: Nx = {:+.3e} lb/in, Ny = {:+.3e} lb/in, Nxy = {:+.3e} lb/in",
        summary.loading.forces[0], summary.loading.forces[1], summary.loading.forces[2]
    )
    .expect("writing to string cannot fail");
    writeln!(
        &mut output,
        "Moment resultants: Mx = {:+.3e} lb-in/in, My = {:+.3e} lb-in/in, Mxy = {:+.3e} lb-in/in",
        summary.loading.moments[0], summary.loading.moments[1], summary.loading.moments[2]
    )
    .expect("writing to string cannot fail");

    writeln!(
        &mut output,
        "Midplane strains: ex = {:+.3e}, ey = {:+.3e}, gxy = {:+.3e}",
        summary.response.midplane_strains[0],
        summary.response.midplane_strains[1],
        summary.response.midplane_strains[2]
    )
    .expect("writing to string cannot fail");

    writeln!(
        &mut output,
        "Effective constants: Ex = {:.3e} psi, Ey = {:.3e} psi, Gxy = {:.3e} psi, vxy = {:.3}",
        summary.constants.ex, summary.constants.ey, summary.constants.gxy, summary.constants.nu_xy
    )
    .expect("writing to string cannot fail");

    writeln!(
        &mut output,
        "Layup: {} plies ({:.0}% at 0 deg, {:.0}% at +/-45 deg, {:.0}% at 90 deg)",
        summary.distribution.total_plies,
        summary.distribution.percent_zero,
        summary.distribution.percent_forty_five,
        summary.distribution.percent_ninety,
    )
    .expect("writing to string cannot fail");

    for record in &summary.plies {
        writeln!(
            &mut output,
            "Ply {:>2} ({:>+6.1} deg): s1 = {:+.3e} psi, s2 = {:+.3e} psi, t12 = {:+.3e} psi, FI = {:.3}, FoS = {}",
            record.ply + 1,
            record.angle,
            record.local_stress[0],
            record.local_stress[1],
            record.local_stress[2],
            record.failure_index,
            format_factor(record.factor_of_safety),
        )
        .expect("writing to string cannot fail");
    }

    if let Some(critical) = summary.critical_ply() {
        writeln!(
            &mut output,
            "Critical ply: {} at {:+.1} deg, factor of safety = {}",
            critical.ply + 1,
            critical.angle,
            format_factor(critical.factor_of_safety),
        )
        .expect("writing to string cannot fail");
    } else {
        output.push_str("Critical ply: none (laminate is unstressed)\n");
    }

    output
}

/// Format a factor of safety, flagging unstressed plies.
fn format_factor(factor: f64) -> String {
    if factor.is_finite() {
        format!("{factor:.2}")
    } else {
        "inf".to_string()
    }
}
