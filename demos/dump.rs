use std::env;
use std::path::Path;

use candlekit::Result;
use candlekit::formats::mcs::SaveFile;
use candlekit::formats::til::TileAtlas;

fn main() -> Result<()> {
    env_logger::init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: dump <SAVE.MCS | EGAxx.TIL>");
        return Ok(());
    };

    let is_tiles = Path::new(&path)
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("til"));

    if is_tiles {
        let atlas = TileAtlas::open(&path)?;
        for (offset, tile) in atlas.iter() {
            println!("tile at {offset:#06x}");
            for y in 0..tile.pixels.len() {
                let row: String = tile.row(y).iter().map(|p| format!("{p:x}")).collect();
                println!("  {row}");
            }
        }
    } else {
        let save = SaveFile::open(&path)?;
        for row in save.rows() {
            let plain: Vec<String> = row.filled().map(|c| format!("{:#04x}", c.plain)).collect();
            println!("{:#05x}\t{}\t{}", row.start, plain.join(" "), row.text());
        }
    }

    Ok(())
}
