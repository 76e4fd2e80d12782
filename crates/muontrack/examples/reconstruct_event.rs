use muontrack::{Event, ReconstructConfig, Reconstructor};
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <event.json> [config.json] [out.json]", args[0]);
        std::process::exit(2);
    }

    let mut event: Event = serde_json::from_str(&std::fs::read_to_string(&args[1])?)?;
    let config = match args.get(2) {
        Some(path) => ReconstructConfig::from_json_file(Path::new(path))?,
        None => ReconstructConfig::default(),
    };

    let reco = Reconstructor::try_new(config)?;
    println!("{}", event.summary());
    match reco.reconstruct_detailed(&event.hits) {
        Ok(r) => {
            println!(
                "theta = {:.2} deg, phi = {:.2} deg (chamber angles {:.2} / {:.2})",
                r.theta_deg, r.phi_deg, r.chamber0.angle_deg, r.chamber1.angle_deg
            );
            event.reconstruction = Some(r);
        }
        Err(reason) => println!("No reconstruction: {reason}"),
    }

    if let Some(out_path) = args.get(3) {
        let json = serde_json::to_string_pretty(&event)?;
        std::fs::write(out_path, json)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
