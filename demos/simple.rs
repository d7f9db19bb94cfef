use laminatx::{Laminate, Loading, MaterialLibrary};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Pick a material from the built-in library.
    let library = MaterialLibrary::builtin();
    let material = library
        .get("T300/5208_graphite_epoxy")
        .expect("built-in material available")
        .clone();

    // Build a quasi-isotropic eight-ply laminate.
    let laminate = Laminate::symmetric(material, &[0.0, 45.0, -45.0, 90.0], 0.005)?;
    let model = laminate.stiffness();

    // Apply a membrane load and solve the response.
    let response = model.response(&Loading::membrane(100.0, 0.0, 0.0))?;
    println!("ex0 = {:.3e}", response.midplane_strains[0]);

    // Report the effective in-plane moduli.
    let constants = model.engineering_constants();
    println!("Ex = {:.3e} psi, Gxy = {:.3e} psi", constants.ex, constants.gxy);

    Ok(())
}
