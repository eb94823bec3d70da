use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::{AppConfig, DEFAULT_CONFIG_FILE};
use crate::engine::{compress_file, decompress_file, read_header};
use crate::proof::{verify_container, verify_file, VerificationReport};
use crate::report::{display_symbol, ContainerSummary};

#[derive(Parser)]
#[command(name = "huffzip")]
#[command(about = "Huffman file compressor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Config file path")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Output as JSON")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress a file into a container
    Compress {
        input: PathBuf,
        output: PathBuf,
    },
    /// Restore the original file from a container
    Decompress {
        input: PathBuf,
        output: PathBuf,
    },
    /// Show the header and code table of a container
    Inspect {
        container: PathBuf,
    },
    /// Round-trip a file in memory and compare digests
    Verify {
        input: PathBuf,
    },
    /// Write a config file with default settings
    GenerateConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE, help = "Config file path")]
        output: String,
    },
}

pub fn run(cli: Cli, config: AppConfig) -> Result<()> {
    match cli.command {
        Commands::Compress { input, output } => {
            let stats = match compress_file(&input, &output, &config.engine) {
                Ok(stats) => stats,
                Err(e) => {
                    report_error(cli.json, "Compression failed", &e);
                    return Err(e.into());
                }
            };

            let verification = if config.engine.verify_after_compress {
                Some(verify_container(&input, &output)?)
            } else {
                None
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                    "status": "compressed",
                    "output": output,
                    "stats": stats,
                    "ratio": stats.ratio(),
                    "verification": verification,
                }))?);
            } else {
                println!("📦 Compressed {:?} -> {:?}", input, output);
                println!("   Input: {} bytes", stats.input_bytes);
                println!("   Output: {} bytes ({:.1}%)", stats.output_bytes, stats.ratio() * 100.0);
                println!("   Distinct symbols: {}", stats.distinct_symbols);
                println!("   Bits per symbol: {:.3}", stats.bits_per_symbol());
                if let Some(report) = &verification {
                    print_verification(report);
                }
            }

            if let Some(report) = verification {
                if !report.lossless {
                    anyhow::bail!("container {:?} does not restore {:?}", output, input);
                }
            }
            Ok(())
        }
        Commands::Decompress { input, output } => {
            let stats = match decompress_file(&input, &output, &config.engine) {
                Ok(stats) => stats,
                Err(e) => {
                    report_error(cli.json, "Decompression failed", &e);
                    return Err(e.into());
                }
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                    "status": "decompressed",
                    "output": output,
                    "stats": stats,
                }))?);
            } else {
                println!("📂 Decompressed {:?} -> {:?}", input, output);
                println!("   Container: {} bytes", stats.container_bytes);
                println!("   Restored: {} bytes", stats.output_bytes);
            }
            Ok(())
        }
        Commands::Inspect { container } => {
            let file = File::open(&container)?;
            let total_len = file.metadata()?.len();
            let header = read_header(&mut BufReader::new(file))?;
            let payload_bytes = total_len.saturating_sub(crate::protocol::ContainerHeader::SIZE as u64);
            let summary = ContainerSummary::from_header(&header, payload_bytes);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("🔍 Container {:?}", container);
                println!("=====================");
                println!("   Format version: {}", summary.version);
                println!("   Symbols: {}", summary.symbol_count);
                println!("   Distinct symbols: {}", summary.distinct_symbols);
                println!("   Tree depth: {}", summary.tree_depth);
                println!("   Payload: {} bytes", summary.payload_bytes);
                match summary.expected_payload_bits {
                    Some(bits) if bits.div_ceil(8) == summary.payload_bytes => {
                        println!("   ✅ Payload length matches header ({} bits)", bits);
                    }
                    Some(bits) => {
                        println!("   ⚠️  Header expects {} payload bytes", bits.div_ceil(8));
                    }
                    None => println!("   ⚠️  Payload length overflows"),
                }

                if !summary.codes.is_empty() {
                    println!();
                    println!("Huffman codes:");
                    for entry in &summary.codes {
                        println!("   {} (freq: {}): {}", display_symbol(entry.symbol), entry.frequency, entry.code);
                    }
                }
            }
            Ok(())
        }
        Commands::Verify { input } => {
            let report = verify_file(&input)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("🧪 Verifying round trip for {:?}", input);
                println!("=============================");
                print_verification(&report);
            }

            if !report.lossless {
                anyhow::bail!("round trip of {:?} is not lossless", input);
            }
            Ok(())
        }
        Commands::GenerateConfig { output } => {
            config.save(&output)?;
            if cli.json {
                println!("{}", serde_json::json!({"status": "created", "path": output}));
            } else {
                println!("✅ Config written to {}", output);
            }
            Ok(())
        }
    }
}

fn print_verification(report: &VerificationReport) {
    if report.lossless {
        println!("   ✅ Lossless: {} bytes, sha256 {}", report.original_bytes, report.original_sha256);
    } else {
        println!("   ❌ Mismatch");
        println!("      Original: {}", report.original_sha256);
        println!("      Restored: {}", report.restored_sha256);
    }
}

fn report_error(json: bool, context: &str, e: &dyn std::error::Error) {
    if json {
        println!("{}", serde_json::json!({"error": format!("{}: {}", context, e)}));
    } else {
        eprintln!("❌ {}: {}", context, e);
    }
}
