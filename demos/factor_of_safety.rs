use laminatx::{analyze, Component, Criterion, FlightConditions, MaterialLibrary};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A pressurized airframe carrying an axial load.
    let component = Component::standard_airframe();
    let conditions = FlightConditions {
        internal_pressure: 50.0,
        axial_load: 1_000.0,
        ..FlightConditions::default()
    };

    // Analyze the laminate under the Tsai-Wu criterion.
    let library = MaterialLibrary::builtin();
    let summary = analyze(&component, &library, &conditions, Criterion::TsaiWu)?;

    // Retrieve and print the limiting factor of safety.
    if let Some(critical) = summary.critical_ply() {
        println!(
            "Critical ply {} at {:+.1} deg: factor of safety = {:.2}",
            critical.ply + 1,
            critical.angle,
            critical.factor_of_safety
        );
    } else {
        println!("The laminate is unstressed.");
    }

    Ok(())
}
