use crate::cli::EvaluateArgs;
use crate::error::Result;
use pairff::core::forcefield::params::SystemParams;
use pairff::workflows::evaluate::{self, EvaluationRequest, EvaluationResult};
use tracing::info;

pub fn run(args: EvaluateArgs) -> Result<()> {
    info!("Loading system description from {:?}", &args.system);
    let params = SystemParams::load(&args.system)?;

    let request = EvaluationRequest {
        gradient: args.gradient,
        hessian: args.hessian,
    };
    let result = evaluate::evaluate(&params, &request)?;
    print!("{}", render(&result));
    Ok(())
}

pub fn render(result: &EvaluationResult) -> String {
    let terms = &result.terms;
    let mut out = format!("energy          {:>22.12e}\n", result.energy);
    for (name, value) in [
        ("charge-charge", terms.charge_charge),
        ("charge-dipole", terms.charge_dipole),
        ("dipole-dipole", terms.dipole_dipole),
        ("dispersion", terms.dispersion),
        ("pauli", terms.pauli),
    ] {
        out.push_str(&format!("  {name:<13} {value:>22.12e}\n"));
    }

    if let Some(gradient) = &result.gradient {
        out.push_str("gradient\n");
        for g in gradient {
            out.push_str(&format!("{:>22.12e} {:>22.12e} {:>22.12e}\n", g.x, g.y, g.z));
        }
    }
    if let Some(hessian) = &result.hessian {
        out.push_str(&format!("hessian {}x{}\n", hessian.nrows(), hessian.ncols()));
        for row in hessian.row_iter() {
            let line: Vec<String> = row.iter().map(|v| format!("{v:>22.12e}")).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
    }
    out
}
