use serde::Serialize;
use spine2d_data::{Atlas, AtlasPage, AtlasRegion, PathTextureLoader};
use std::{env, path::PathBuf};

fn usage() -> ! {
    eprintln!("Usage:\n  atlas_dump <file.atlas> [--flip-v] [--region <name>]\n");
    std::process::exit(2);
}

#[derive(Serialize)]
struct PageDump<'a> {
    #[serde(flatten)]
    page: &'a AtlasPage<PathBuf>,
    texture: Option<String>,
}

#[derive(Serialize)]
struct Dump<'a> {
    pages: Vec<PageDump<'a>>,
    regions: Vec<&'a AtlasRegion>,
}

fn main() {
    let args = env::args().skip(1).collect::<Vec<_>>();
    let Some(atlas_path) = args.first() else {
        usage();
    };

    let mut flip_v = false;
    let mut only: Option<String> = None;

    let mut i = 1usize;
    while i < args.len() {
        match args[i].as_str() {
            "--flip-v" => {
                flip_v = true;
                i += 1;
            }
            "--region" if i + 1 < args.len() => {
                only = Some(args[i + 1].to_string());
                i += 2;
            }
            _ => usage(),
        }
    }

    let mut atlas = Atlas::from_path(atlas_path, PathTextureLoader).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(2);
    });
    if flip_v {
        atlas.flip_v();
    }

    let regions = match only.as_deref() {
        Some(name) => match atlas.find_region(name) {
            Some(region) => vec![region],
            None => {
                eprintln!("no region named {name} in {atlas_path}");
                std::process::exit(1);
            }
        },
        None => atlas.iter().collect(),
    };

    let dump = Dump {
        pages: atlas
            .pages()
            .iter()
            .map(|page| PageDump {
                page,
                texture: page
                    .renderer_object
                    .as_ref()
                    .map(|path| path.display().to_string()),
            })
            .collect(),
        regions,
    };

    match serde_json::to_string_pretty(&dump) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("failed to encode dump: {e}");
            std::process::exit(1);
        }
    }
}
