use blockbind_core::model::Model;
use blockbind_models::{LinearModel, LinearModelError};
use is_close::is_close;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

#[test]
fn load_aero() {
    let mut model = LinearModel::load(&fixture("aero.toml")).unwrap();
    assert_eq!(model.len(), 7);

    let inputs: Vec<String> = model
        .declared_variables()
        .into_iter()
        .filter(|x| x.is_input)
        .map(|x| x.id.to_string())
        .collect();
    assert_eq!(inputs, ["alpha", "mach", "qbar"]);

    let alpha = model.find("alpha").unwrap();
    let qbar = model.find("qbar").unwrap();
    let cd = model.find("cd").unwrap();
    let lift = model.find("lift").unwrap();
    let trim = model.find("trim").unwrap();
    assert_eq!(model.units(alpha), Some("rad"));

    // Defaults: alpha = 0, mach = 0.3
    assert!(is_close!(model.get_value(cd), 0.02 + 0.1 * 0.2 + 0.01 * 0.3));
    assert!(is_close!(model.get_value(trim), 0.01));

    model.set_value(alpha, 0.1);
    model.set_value(qbar, 1000.0);
    // cl = 0.2 + 5 * 0.1
    assert!(is_close!(model.get_value(lift), 0.2 * 1000.0 + 100.0 * 0.7));
}

#[test]
fn load_cyclic() {
    let err = LinearModel::load(&fixture("cyclic.toml")).unwrap_err();
    assert!(matches!(err, LinearModelError::Cycle(ref id) if id == "x" || id == "y"));
}
