use std::{
    collections::HashMap,
    fs::File,
    io::Cursor,
    path::{Path, PathBuf},
};

use badge_banner::{
    BadgeFetcher, BannerConfig, BannerError, BannerResult, Rgb8, fetch_and_compose,
    render_banner,
};

/// Serves canned bytes per URL; anything else fails like a 404.
struct FakeFetcher {
    responses: HashMap<String, BannerResult<Vec<u8>>>,
}

impl FakeFetcher {
    fn new() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }

    fn with(mut self, url: &str, res: BannerResult<Vec<u8>>) -> Self {
        self.responses.insert(url.to_string(), res);
        self
    }
}

impl BadgeFetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> BannerResult<Vec<u8>> {
        match self.responses.get(url) {
            Some(Ok(bytes)) => Ok(bytes.clone()),
            Some(Err(e)) => Err(BannerError::request(url, e.to_string())),
            None => Err(BannerError::request(url, "404 Not Found")),
        }
    }
}

fn png_24x24(rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(24, 24, image::Rgba([rgb[0], rgb[1], rgb[2], 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn out_dir() -> PathBuf {
    let dir = PathBuf::from("target").join("pipeline_fake_fetch");
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn test_config(urls: &[&str], out: &str) -> BannerConfig {
    BannerConfig {
        canvas_width: 300,
        canvas_height: 70,
        padding_x: 10,
        fps: 25,
        duration_seconds: 2.0,
        background_rgb: Rgb8::new(13, 17, 23),
        output_path: out_dir().join(out),
        badge_urls: urls.iter().map(|s| s.to_string()).collect(),
        ..BannerConfig::default()
    }
}

fn three_badges() -> FakeFetcher {
    FakeFetcher::new()
        .with("a", Ok(png_24x24([255, 0, 0])))
        .with("b", Ok(png_24x24([0, 255, 0])))
        .with("c", Ok(png_24x24([0, 0, 255])))
}

fn count_gif_frames(path: &Path) -> (usize, u16, u16) {
    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::Indexed);
    let mut dec = opts.read_info(File::open(path).unwrap()).unwrap();
    let (w, h) = (dec.width(), dec.height());
    let mut n = 0;
    while dec.read_next_frame().unwrap().is_some() {
        n += 1;
    }
    (n, w, h)
}

#[test]
fn three_synthetic_badges_compose_to_170x50() {
    let cfg = test_config(&["a", "b", "c"], "unused.gif");
    let (strip, fetched) = fetch_and_compose(&cfg, &three_badges()).unwrap();
    assert_eq!(fetched, 3);
    assert_eq!((strip.width, strip.height), (170, 50));
}

#[test]
fn renders_fifty_canvas_sized_frames() {
    let cfg = test_config(&["a", "b", "c"], "three.gif");
    let _ = std::fs::remove_file(&cfg.output_path);

    let stats = render_banner(&cfg, &three_badges()).unwrap();
    assert_eq!(stats.frames, 50);
    assert_eq!(stats.fps, 25);
    assert_eq!(stats.strip_width, 170);
    assert_eq!(stats.badges_fetched, 3);
    assert_eq!(stats.badges_requested, 3);

    let (frames, w, h) = count_gif_frames(&cfg.output_path);
    assert_eq!(frames, 50);
    assert_eq!((w, h), (300, 70));
}

#[test]
fn failed_badges_are_skipped_and_others_proceed() {
    let fetcher = three_badges()
        .with(
            "html",
            Err(BannerError::ContentType {
                url: "html".to_string(),
                content_type: "text/html".to_string(),
                snippet: "<html>".to_string(),
            }),
        )
        .with("garbage", Ok(b"definitely not a png".to_vec()));

    let cfg = test_config(&["a", "html", "missing", "garbage", "c"], "skipped.gif");
    let stats = render_banner(&cfg, &fetcher).unwrap();
    assert_eq!(stats.badges_requested, 5);
    assert_eq!(stats.badges_fetched, 2);
    assert_eq!(stats.strip_width, 50 + 10 + 50);
    assert!(cfg.output_path.exists());
}

#[test]
fn zero_badges_fails_without_writing() {
    let cfg = test_config(&["x", "y"], "nothing.gif");
    let _ = std::fs::remove_file(&cfg.output_path);

    let err = render_banner(&cfg, &FakeFetcher::new()).unwrap_err();
    assert!(matches!(err, BannerError::NoBadges));
    assert!(!cfg.output_path.exists());
}

#[test]
fn creates_missing_output_directory() {
    let nested = out_dir().join("nested").join("deeper");
    let _ = std::fs::remove_dir_all(&nested);

    let mut cfg = test_config(&["a"], "x.gif");
    cfg.output_path = nested.join("banner.gif");
    cfg.duration_seconds = 0.2;

    let stats = render_banner(&cfg, &three_badges()).unwrap();
    assert_eq!(stats.frames, 5);
    assert!(cfg.output_path.exists());
}

#[test]
fn invalid_config_is_rejected_before_fetching() {
    let mut cfg = test_config(&["a"], "invalid.gif");
    cfg.fps = 0;
    assert!(matches!(
        render_banner(&cfg, &three_badges()),
        Err(BannerError::Validation(_))
    ));
}
