use fabin_rs::{
    ContainerCodec, GridQueries, MemoryStore, Position, SequenceRecord, SequenceStore,
};
use std::env;
use std::fs;

/// Encodes a file into a container, decodes it back and runs a grid query.
///
/// Each line of the input becomes the symbols of one record laid out at the
/// width of the longest line.
///
/// Usage: cargo run --example main <input> <output.fabin>
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <input> <output.fabin>", args[0]);
        std::process::exit(1);
    }

    let (input, output) = (&args[1], &args[2]);

    let text = fs::read(input).unwrap_or_else(|_| {
        eprintln!("File \"{}\" not found.", input);
        std::process::exit(1);
    });

    let lines: Vec<&[u8]> = text
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.is_empty())
        .collect();
    let width = lines.iter().map(|l| l.len()).max().unwrap_or(1);
    let records: Vec<SequenceRecord> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| SequenceRecord::new(format!("line{}", i + 1), line.to_vec(), width))
        .collect::<Result<_, _>>()
        .expect("width is positive");

    let mut store = MemoryStore::from_records(records);
    let codec = ContainerCodec::default();
    codec.config().print();

    let stats = codec.save_to_path(&store, output).unwrap_or_else(|e| {
        eprintln!("Cannot encode {}: {}", input, e);
        std::process::exit(1);
    });

    // Verify by decoding into a fresh store
    let original = store.list().to_vec();
    store.replace_all(Vec::new());
    codec
        .load_from_path(&mut store, output)
        .expect("container we just wrote should decode");
    if store.list() != original.as_slice() {
        eprintln!("Mismatch after decoding {}", output);
    }

    println!("\n=== Statistics ===");
    println!("Records: {}", stats.records);
    println!("Symbols: {}", stats.symbols);
    println!("Distinct symbols: {}", stats.distinct_symbols);
    println!("Container bytes: {}", stats.encoded_bytes);
    println!("Compression ratio: {:.2}%", stats.compression_ratio());

    let Some(first) = store.list().first() else {
        return;
    };
    let queries = GridQueries::default();
    let origin = Position::new(0, 0);
    match queries.remote_symbol(&store, first.name(), origin) {
        Ok(Some(remote)) => println!(
            "\nRemote '{}' from {} is at {} (cost {:.4}, {} hops)",
            remote.symbol as char,
            origin,
            remote.position,
            remote.route.total_cost,
            remote.route.hops()
        ),
        Ok(None) => println!("\nSymbol at {} occurs only once in {}", origin, first.name()),
        Err(e) => println!("\nQuery failed: {}", e),
    }
}
