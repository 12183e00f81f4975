use std::path::PathBuf;

use overlay_canvas::{
    CpuRenderer, CpuRendererOpts, DirImageSource, DirStore, Editor, EditorCommand, EditorOpts,
    ImageRef, InputEvent, Point,
};

fn write_solid(path: &std::path::Path, w: u32, h: u32, rgba: [u8; 4]) -> anyhow::Result<()> {
    let data: Vec<u8> = rgba.repeat((w * h) as usize);
    image::save_buffer_with_format(
        path,
        &data,
        w,
        h,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let dir = PathBuf::from("target").join("demos").join("replay_script");
    std::fs::create_dir_all(&dir)?;
    write_solid(&dir.join("base.png"), 320, 200, [30, 60, 120, 255])?;
    write_solid(&dir.join("sticker.png"), 32, 32, [240, 200, 40, 255])?;

    let script = vec![
        EditorCommand::AddOverlay {
            src: ImageRef::new("sticker.png"),
        },
        EditorCommand::Input {
            event: InputEvent::Wheel { delta_y: 60.0 },
        },
        EditorCommand::Input {
            event: InputEvent::PointerDown {
                at: Point::new(20.0, 20.0),
            },
        },
        EditorCommand::Input {
            event: InputEvent::PointerMove {
                at: Point::new(80.0, 50.0),
            },
        },
        EditorCommand::Input {
            event: InputEvent::PointerUp,
        },
        EditorCommand::ToggleFlip,
    ];
    eprintln!("{}", serde_json::to_string_pretty(&script)?);

    let mut editor = Editor::open(
        ImageRef::new("base.png"),
        DirImageSource::new(&dir),
        CpuRenderer::new(CpuRendererOpts::default().with_clear_rgba(Some([18, 20, 28, 255]))),
        EditorOpts::default(),
    )?;
    for cmd in &script {
        editor.apply(cmd)?;
    }

    let mut store = DirStore::new(&dir);
    editor.save_project(&mut store)?;
    let out = editor.export_to_dir(&dir)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}
