use dnaforge::network::AssemblyNetwork;
use dnaforge::reports::{write_json_report, write_json_report_gz};
use dnaforge::sequence::DnaSequence;
use std::env;

fn usage() {
    eprintln!(
        "Usage:\n  \
  dnaforge_cli --version\n  \
  dnaforge_cli quote --network NET.json SEQFILE [--plan OUT.json] [--plan-gz OUT.json.gz]\n  \
  dnaforge_cli summary --network NET.json SEQFILE\n  \
  dnaforge_cli prepare --network NET.json SEQFILE\n\n  \
  SEQFILE is FASTA (.fa/.fasta/.fna, first record) or plain text"
    );
}

fn load_sequence(path: &str) -> Result<DnaSequence, String> {
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".fa") || lower.ends_with(".fasta") || lower.ends_with(".fna") {
        let mut records = DnaSequence::from_fasta_file(path)
            .map_err(|e| format!("could not read FASTA '{path}': {e}"))?;
        if records.is_empty() {
            return Err(format!("FASTA '{path}' contains no records"));
        }
        Ok(records.remove(0))
    } else {
        DnaSequence::from_text_file(path).map_err(|e| format!("could not read '{path}': {e}"))
    }
}

fn parse_network_arg(args: &[String]) -> Result<(AssemblyNetwork, &[String]), String> {
    if args.len() < 2 || args[0] != "--network" {
        return Err("expected --network NET.json".to_string());
    }
    let network = AssemblyNetwork::from_json_file(&args[1]).map_err(|e| e.to_string())?;
    Ok((network, &args[2..]))
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage();
        return Err("missing command".to_string());
    }
    match args[1].as_str() {
        "--version" => {
            println!("dnaforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "quote" => {
            let (network, rest) = parse_network_arg(&args[2..])?;
            if rest.is_empty() {
                usage();
                return Err("missing sequence file".to_string());
            }
            let sequence = load_sequence(&rest[0])?;
            let mut plan_path = None;
            let mut plan_gz_path = None;
            let mut i = 1;
            while i < rest.len() {
                match rest[i].as_str() {
                    "--plan" if i + 1 < rest.len() => {
                        plan_path = Some(rest[i + 1].clone());
                        i += 2;
                    }
                    "--plan-gz" if i + 1 < rest.len() => {
                        plan_gz_path = Some(rest[i + 1].clone());
                        i += 2;
                    }
                    other => return Err(format!("unexpected argument '{other}'")),
                }
            }
            let with_plan = plan_path.is_some() || plan_gz_path.is_some();
            network.prepare_network_on_sequence(&sequence);
            let quote = network.get_quote(&sequence, with_plan);
            let text = serde_json::to_string_pretty(&quote)
                .map_err(|e| format!("could not serialize quote: {e}"))?;
            println!("{text}");
            if let Some(path) = plan_path {
                write_json_report(&quote, &path).map_err(|e| e.to_string())?;
            }
            if let Some(path) = plan_gz_path {
                write_json_report_gz(&quote, &path).map_err(|e| e.to_string())?;
            }
            Ok(())
        }
        "summary" => {
            let (network, rest) = parse_network_arg(&args[2..])?;
            if rest.is_empty() {
                usage();
                return Err("missing sequence file".to_string());
            }
            let sequence = load_sequence(&rest[0])?;
            network.prepare_network_on_sequence(&sequence);
            let quote = network.get_quote(&sequence, true);
            print!("{}", quote.assembly_step_summary());
            Ok(())
        }
        "prepare" => {
            let (network, rest) = parse_network_arg(&args[2..])?;
            if rest.is_empty() {
                usage();
                return Err("missing sequence file".to_string());
            }
            let sequence = load_sequence(&rest[0])?;
            network.prepare_network_on_sequence(&sequence);
            println!("network prepared for {} bp", sequence.len());
            Ok(())
        }
        _ => {
            usage();
            Err(format!("unknown command '{}'", args[1]))
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
