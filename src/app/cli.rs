use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use rustc_hash::FxHashMap;
use tracing::info;

use blockgen::server::{GenerationClient, GenerationServer, ProtocolError, Request, Response};
use blockgen::settings::{self, SettingsError};
use blockgen::{
    Biome, BlockType, ChunkGenerator, ChunkLoader, ChunkResponse, ServiceError, WorldSeed,
    WorldService,
};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("server error: {0}")]
    Remote(String),
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Deterministic voxel world generator", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve generation requests over TCP
    Serve {
        /// Settings file (bincode); defaults are used when it does not exist
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Address to bind to
        #[arg(long)]
        address: Option<String>,

        /// Port to bind to (default: 25565)
        #[arg(long)]
        port: Option<u16>,

        /// Seed used when a request carries none
        #[arg(long)]
        seed: Option<String>,

        /// Maximum blocking threads used for generation
        #[arg(long)]
        threads: Option<usize>,

        /// Write the effective settings back to the settings file
        #[arg(long, requires = "settings")]
        save: bool,
    },

    /// Generate one chunk locally and print a summary
    Chunk {
        #[arg(allow_hyphen_values = true)]
        x: String,

        #[arg(allow_hyphen_values = true)]
        z: String,

        #[arg(long)]
        seed: Option<String>,
    },

    /// Request one chunk from a running server and print a summary
    Fetch {
        #[arg(allow_hyphen_values = true)]
        x: String,

        #[arg(allow_hyphen_values = true)]
        z: String,

        #[arg(long)]
        seed: Option<String>,

        /// Server address
        #[arg(long, default_value = "127.0.0.1:25565")]
        addr: String,
    },

    /// Generate a square of chunks on a worker pool and print totals
    Region {
        /// Center chunk x
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        x: i32,

        /// Center chunk z
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        z: i32,

        /// Chunks generated in each direction from the center
        #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(i32).range(0..=256))]
        radius: i32,

        #[arg(long)]
        seed: Option<String>,

        /// Worker threads (default: one per CPU)
        #[arg(long)]
        threads: Option<usize>,
    },
}

pub fn run() -> Result<(), AppError> {
    let args = Args::parse();

    match args.command {
        Command::Serve {
            settings,
            address,
            port,
            seed,
            threads,
            save,
        } => {
            let mut config = match &settings {
                Some(path) => settings::load_or_default(path)?,
                None => settings::ServerSettings::default(),
            };
            if let Some(address) = address {
                config.address = address;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(seed) = seed {
                config.default_seed = seed;
            }
            if let Some(threads) = threads {
                config.generation_threads = threads;
            }
            if let (true, Some(path)) = (save, &settings) {
                settings::save_settings(path, &config)?;
                info!(path = %path.display(), "saved settings");
            }
            serve(config)
        }
        Command::Chunk { x, z, seed } => {
            let service = WorldService::default();
            let chunk = service.chunk(&x, &z, seed.as_deref())?;
            print_summary(&chunk, seed.as_deref().unwrap_or(service.default_seed().as_str()));
            Ok(())
        }
        Command::Fetch { x, z, seed, addr } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let request = Request::Chunk {
                x,
                z,
                seed: seed.clone(),
            };
            let response = runtime.block_on(async {
                let mut client = GenerationClient::connect(&addr).await?;
                let response = client.request(&request).await?;
                Ok::<_, AppError>(response)
            })?;

            match response {
                Response::Chunk(chunk) => {
                    print_summary(&chunk, seed.as_deref().unwrap_or("<server default>"));
                    Ok(())
                }
                Response::Error { message } => Err(AppError::Remote(message)),
                other => Err(AppError::Remote(format!("unexpected response: {other:?}"))),
            }
        }
        Command::Region {
            x,
            z,
            radius,
            seed,
            threads,
        } => region(x, z, radius, seed, threads),
    }
}

fn region(
    center_x: i32,
    center_z: i32,
    radius: i32,
    seed: Option<String>,
    threads: Option<usize>,
) -> Result<(), AppError> {
    let seed = seed.map(WorldSeed::from).unwrap_or_default();
    let generator = ChunkGenerator::new(seed.clone());
    check_region(&generator, center_x, center_z, radius)?;
    let mut loader = match threads {
        Some(threads) => ChunkLoader::with_worker_count(threads, &generator)?,
        None => ChunkLoader::new(&generator)?,
    };

    let mut requests = Vec::new();
    for dx in -radius..=radius {
        for dz in -radius..=radius {
            requests.push((center_x + dx, center_z + dz, dx * dx + dz * dz));
        }
    }
    requests.sort_by_key(|&(_, _, priority)| priority);

    let started = Instant::now();
    let mut remaining = requests.len();
    let mut next = 0;
    let mut blocks = 0usize;
    let mut trees = 0usize;
    let mut biomes: FxHashMap<Biome, usize> = FxHashMap::default();

    while remaining > 0 {
        // The request queue is bounded; top it up as results drain
        while let Some(&(cx, cz, priority)) = requests.get(next) {
            if !loader.request_chunk(cx, cz, priority) {
                break;
            }
            next += 1;
        }
        let Some(result) = loader.wait_result() else {
            break;
        };
        blocks += result.chunk.len();
        if !result.structures.is_empty() {
            trees += 1;
        }
        *biomes
            .entry(generator.classify_biome(result.chunk_x, result.chunk_z))
            .or_default() += 1;
        remaining -= 1;
    }

    info!(
        chunks = requests.len(),
        workers = loader.worker_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "region generated"
    );

    println!(
        "region around ({}, {}) radius {} seed {:?}",
        center_x, center_z, radius, seed.as_str()
    );
    println!("  chunks: {}", requests.len() - remaining);
    println!("  blocks: {}", blocks);
    println!("  chunks with trees: {}", trees);
    for biome in [
        Biome::Ocean,
        Biome::Plains,
        Biome::Forest,
        Biome::Hills,
        Biome::Mountains,
    ] {
        if let Some(count) = biomes.get(&biome) {
            println!("    {:<10} {}", biome.name(), count);
        }
    }
    Ok(())
}

/// Reject regions reaching chunks whose blocks fall outside `i32` world coordinates
fn check_region(
    generator: &ChunkGenerator,
    center_x: i32,
    center_z: i32,
    radius: i32,
) -> Result<(), ServiceError> {
    for (axis, center) in [("x", center_x), ("z", center_z)] {
        let fits = match (center.checked_sub(radius), center.checked_add(radius)) {
            (Some(low), Some(high)) => {
                generator.contains_chunk(low, 0) && generator.contains_chunk(high, 0)
            }
            _ => false,
        };
        if !fits {
            return Err(ServiceError::InvalidCoordinate {
                axis,
                value: center.to_string(),
            });
        }
    }
    Ok(())
}

fn serve(config: settings::ServerSettings) -> Result<(), AppError> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if config.generation_threads > 0 {
        builder.max_blocking_threads(config.generation_threads);
    }
    let runtime = builder.build()?;

    let service = Arc::new(WorldService::new(
        config.generation,
        WorldSeed::from(config.default_seed.as_str()),
    ));

    runtime.block_on(async {
        let server = GenerationServer::bind(&config.bind_address(), service).await?;
        server.run().await
    })?;
    Ok(())
}

fn print_summary(chunk: &ChunkResponse, seed: &str) {
    println!("chunk ({}, {}) seed {:?}", chunk.chunk_x, chunk.chunk_z, seed);
    println!("  biome: {}", chunk.biome);
    println!("  blocks: {}", chunk.blocks.len());
    for kind in BlockType::ALL {
        let count = chunk.blocks.iter().filter(|b| b.kind == kind).count();
        if count > 0 {
            println!("    {:<8} {}", kind.name(), count);
        }
    }
    if let (Some(min), Some(max)) = (
        chunk.blocks.iter().map(|b| b.y).min(),
        chunk.blocks.iter().map(|b| b.y).max(),
    ) {
        println!("  y range: {}..={}", min, max);
    }
    println!("  structure blocks: {}", chunk.structures.len());
}
