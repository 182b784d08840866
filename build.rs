use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use resvg::{tiny_skia, usvg};

const ICON_SVG: &str = "assets/jsonshelf-icon.svg";
const ICON_SIZE: u32 = 256;

fn rasterize_icon(size: u32) -> Option<Vec<u8>> {
    let svg = include_bytes!("assets/jsonshelf-icon.svg");
    let tree = usvg::Tree::from_data(svg, &usvg::Options::default()).ok()?;
    let mut pixmap = tiny_skia::Pixmap::new(size, size)?;
    let natural = tree.size().to_int_size();
    let transform = tiny_skia::Transform::from_scale(
        size as f32 / natural.width() as f32,
        size as f32 / natural.height() as f32,
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    Some(pixmap.data().to_vec())
}

fn write_ico(rgba: Vec<u8>, out: &Path) -> std::io::Result<()> {
    let image = IconImage::from_rgba_data(ICON_SIZE, ICON_SIZE, rgba);
    let entry = IconDirEntry::encode(&image)?;
    let mut icon_dir = IconDir::new(ResourceType::Icon);
    icon_dir.add_entry(entry);
    let mut file = File::create(out)?;
    icon_dir.write(&mut file)
}

fn main() {
    println!("cargo:rerun-if-changed={ICON_SVG}");

    if !env::var("TARGET").unwrap_or_default().contains("windows") {
        return;
    }

    let rgba = rasterize_icon(ICON_SIZE).expect("render jsonshelf icon");
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));
    let ico_path = out_dir.join("jsonshelf.ico");
    write_ico(rgba, &ico_path).expect("write jsonshelf.ico");

    // Resource compilation needs rc.exe, which only exists on Windows hosts
    // unless RC points at a cross toolchain.
    let can_compile_rc = env::var("HOST").unwrap_or_default().contains("windows")
        || env::var("RC").is_ok();
    if !can_compile_rc {
        println!("cargo:warning=jsonshelf: icon not embedded (no resource compiler, set RC)");
        return;
    }

    let mut res = winres::WindowsResource::new();
    res.set_icon(ico_path.to_str().expect("ico path utf-8"));
    if let Err(err) = res.compile() {
        println!("cargo:warning=jsonshelf: failed to embed icon: {err}");
    }
}
