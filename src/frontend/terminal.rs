//! Truecolor terminal frontend
//!
//! Each terminal cell shows two vertically stacked pixels through the upper
//! half block glyph, so a pixel is roughly square. The 400x600 world is
//! scaled uniformly into whatever the terminal offers and centered.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{self, Color as CColor},
    terminal,
};
use glam::{IVec2, Vec2};

use super::{Palette, Resources, Rgb};
use crate::app::{FrontendError, InputSource, Renderer};
use crate::sim::{Frame, GamePhase, InputEvent, Sprite, SpriteKind};
use crate::tuning::Tuning;

/// Raw mode plus alternate screen for as long as the value lives
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(e) = execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        ) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        log::debug!("Entered alternate screen");
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let _ = execute!(
            out,
            style::ResetColor,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
        log::debug!("Restored terminal");
    }
}

// === Key mapping ===

/// Events a key press stands for
///
/// Space both jumps and restarts; the tick ignores whichever one the
/// current phase has no use for.
pub fn map_key(key: KeyEvent) -> &'static [InputEvent] {
    if key.kind != KeyEventKind::Press {
        return &[];
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => &[InputEvent::Quit],
        KeyCode::Char(' ') => &[InputEvent::Jump, InputEvent::Restart],
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => &[InputEvent::Jump],
        KeyCode::Enter | KeyCode::Char('r') => &[InputEvent::Restart],
        KeyCode::Esc => &[InputEvent::Cancel],
        KeyCode::Char('q') => &[InputEvent::Quit],
        _ => &[],
    }
}

/// Non-blocking keyboard reader
#[derive(Debug, Default)]
pub struct KeyboardInput;

impl InputSource for KeyboardInput {
    fn poll(&mut self) -> Result<Vec<InputEvent>, FrontendError> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                events.extend_from_slice(map_key(key));
            }
        }
        Ok(events)
    }
}

// === Pixel buffer ===

struct PixelBuf {
    w: usize,
    /// Pixel height, two per terminal row
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    fn new() -> Self {
        Self {
            w: 0,
            h: 0,
            px: Vec::new(),
        }
    }

    fn resize(&mut self, w: usize, h: usize, fill: Rgb) {
        self.w = w;
        self.h = h;
        self.px.clear();
        self.px.resize(w * h, fill);
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.w as i32);
        let y1 = (y + h).min(self.h as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.px[py as usize * self.w + px as usize] = c;
            }
        }
    }

    fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev: Option<(Rgb, Rgb)> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);
                if prev.is_none_or(|(fg, _)| fg != top) {
                    queue!(out, style::SetForegroundColor(color(top)))?;
                }
                if prev.is_none_or(|(_, bg)| bg != bot) {
                    queue!(out, style::SetBackgroundColor(color(bot)))?;
                }
                prev = Some((top, bot));
                queue!(out, style::Print('\u{2580}'))?;
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                prev = None;
            }
        }
        queue!(out, style::ResetColor)
    }
}

fn color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// === World to pixel mapping ===

/// Uniform scale plus centering offset from world to buffer pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub offset: IVec2,
    /// Size of the scaled world in buffer pixels
    pub size: IVec2,
}

impl Viewport {
    pub fn fit(world: Vec2, buffer: IVec2) -> Self {
        let scale = if world.x > 0.0 && world.y > 0.0 {
            (buffer.x as f32 / world.x).min(buffer.y as f32 / world.y)
        } else {
            0.0
        };
        let size = (world * scale).floor().as_ivec2();
        Self {
            scale,
            offset: (buffer - size) / 2,
            size,
        }
    }

    pub fn to_px(&self, p: Vec2) -> IVec2 {
        (p * self.scale).floor().as_ivec2() + self.offset
    }

    /// Pixel extent of a world length, never less than one pixel
    pub fn len(&self, l: f32) -> i32 {
        ((l * self.scale).round() as i32).max(1)
    }
}

// === HUD ===

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

/// Draw `n` centered on `cx`, each glyph pixel `dot` buffer pixels wide
fn draw_number(buf: &mut PixelBuf, palette: &Palette, cx: i32, y: i32, n: u32, dot: i32) {
    let digits: Vec<u8> = n.to_string().bytes().map(|b| b - b'0').collect();
    let advance = 4 * dot;
    let total_w = digits.len() as i32 * advance - dot;
    let start_x = cx - total_w / 2;
    for (i, &d) in digits.iter().enumerate() {
        let gx = start_x + i as i32 * advance;
        for (k, &on) in DIGITS[d as usize].iter().enumerate() {
            if on == 1 {
                let px = gx + (k % 3) as i32 * dot;
                let py = y + (k / 3) as i32 * dot;
                buf.fill_rect(px + dot.max(2) / 2, py + dot.max(2) / 2, dot, dot, palette.shadow);
                buf.fill_rect(px, py, dot, dot, palette.text);
            }
        }
    }
}

/// Text lines centered over the playfield for the current phase
pub fn overlay_lines(frame: &Frame) -> Vec<String> {
    match frame.phase {
        GamePhase::Begin => vec!["SPACE TO FLAP".to_string(), "Q TO QUIT".to_string()],
        GamePhase::Playing => Vec::new(),
        GamePhase::Ended | GamePhase::AwaitingRestart => {
            let mut lines = vec![
                "GAME OVER".to_string(),
                format!("SCORE {}", frame.final_score.unwrap_or(frame.score)),
            ];
            if let Some(best) = frame.best_score {
                lines.push(format!("BEST {best}"));
            }
            if frame.phase == GamePhase::AwaitingRestart {
                lines.push("SPACE TO RETRY  ESC TO QUIT".to_string());
            }
            lines
        }
    }
}

/// Rolling frame rate over the last 60 draws
#[derive(Debug, Default)]
pub struct FpsCounter {
    times: VecDeque<Instant>,
}

impl FpsCounter {
    const WINDOW: usize = 60;

    pub fn record(&mut self, now: Instant) {
        if self.times.len() == Self::WINDOW {
            self.times.pop_front();
        }
        self.times.push_back(now);
    }

    pub fn fps(&self) -> Option<u32> {
        let (first, last) = (self.times.front()?, self.times.back()?);
        let elapsed = last.duration_since(*first).as_secs_f64();
        if elapsed <= 0.0 {
            return None;
        }
        Some(((self.times.len() - 1) as f64 / elapsed).round() as u32)
    }
}

// === Renderer ===

/// Draws frames onto a terminal through crossterm
pub struct TerminalRenderer<W: Write> {
    out: W,
    res: Resources,
    lip_height: f32,
    body_inset: f32,
    buf: PixelBuf,
    fps: FpsCounter,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, res: Resources, tuning: &Tuning) -> Self {
        Self {
            out,
            res,
            lip_height: tuning.lip_height,
            body_inset: tuning.body_inset,
            buf: PixelBuf::new(),
            fps: FpsCounter::default(),
        }
    }

    fn draw_sky(&mut self, vp: &Viewport) {
        let p = &self.res.palette;
        let h = vp.size.y.max(1);
        for y in 0..vp.size.y {
            let t = (y * 256 / h) as u16;
            let c = Rgb::lerp(p.sky_top, p.sky_bottom, t);
            self.buf.fill_rect(vp.offset.x, vp.offset.y + y, vp.size.x, 1, c);
        }
    }

    fn draw_obstacle(&mut self, vp: &Viewport, sprite: &Sprite) {
        let p = &self.res.palette;
        let origin = vp.to_px(sprite.pos);
        let w = vp.len(sprite.size.x);
        let h = vp.len(sprite.size.y);
        let lip = vp.len(self.lip_height).min(h);
        let inset = vp.len(self.body_inset).min(w / 2);
        let lip_y = match sprite.kind {
            SpriteKind::ObstacleUpper => origin.y + h - lip,
            _ => origin.y,
        };
        let (body_y, body_h) = match sprite.kind {
            SpriteKind::ObstacleUpper => (origin.y, h - lip),
            _ => (origin.y + lip, h - lip),
        };

        self.buf
            .fill_rect(origin.x + inset, body_y, w - 2 * inset, body_h, p.pipe_edge);
        self.buf
            .fill_rect(origin.x + inset + 1, body_y, w - 2 * inset - 2, body_h, p.pipe);
        self.buf.fill_rect(origin.x, lip_y, w, lip, p.pipe_edge);
        self.buf.fill_rect(origin.x + 1, lip_y + 1, w - 2, lip - 2, p.pipe);
    }

    fn draw_ground(&mut self, vp: &Viewport, sprite: &Sprite) {
        let p = &self.res.palette;
        let origin = vp.to_px(sprite.pos);
        let w = vp.len(sprite.size.x);
        let h = vp.len(sprite.size.y);
        self.buf.fill_rect(origin.x, origin.y, w, h, p.ground);
        self.buf.fill_rect(origin.x, origin.y, w, vp.len(12.0), p.grass);
    }

    fn draw_actor(&mut self, vp: &Viewport, sprite: &Sprite) {
        let p = &self.res.palette;
        let origin = vp.to_px(sprite.pos);
        let w = vp.len(sprite.size.x);
        let h = vp.len(sprite.size.y);
        let (rx, ry) = (w as f32 * 0.44, h as f32 * 0.5);
        let center = Vec2::new(origin.x as f32 + rx, origin.y as f32 + ry);
        let wing = p.wing[sprite.frame as usize % p.wing.len()];

        for y in 0..h {
            for x in 0..w {
                let d = (Vec2::new(origin.x as f32 + x as f32 + 0.5, origin.y as f32 + y as f32 + 0.5)
                    - center)
                    / Vec2::new(rx, ry);
                if d.length_squared() <= 1.0 {
                    let c = if d.x < -0.1 && (d.y - (sprite.frame as f32 - 1.0) * 0.3).abs() < 0.3 {
                        wing
                    } else {
                        p.actor
                    };
                    self.buf.set(origin.x + x, origin.y + y, c);
                }
            }
        }
        // Beak
        let bw = (w / 5).max(1);
        let bh = (h / 5).max(1);
        self.buf
            .fill_rect(origin.x + w - bw, origin.y + h / 2 - bh / 2, bw, bh, p.beak);
    }

    fn draw_letterbox(&mut self, vp: &Viewport) {
        let c = self.res.palette.letterbox;
        let (bw, bh) = (self.buf.w as i32, self.buf.h as i32);
        self.buf.fill_rect(0, 0, vp.offset.x, bh, c);
        self.buf
            .fill_rect(vp.offset.x + vp.size.x, 0, bw - vp.offset.x - vp.size.x, bh, c);
        self.buf.fill_rect(0, 0, bw, vp.offset.y, c);
        self.buf
            .fill_rect(0, vp.offset.y + vp.size.y, bw, bh - vp.offset.y - vp.size.y, c);
    }

    fn dim(&mut self) {
        for c in &mut self.buf.px {
            *c = Rgb(c.0 / 2, c.1 / 2, c.2 / 2);
        }
    }

    fn write_overlay(&mut self, lines: &[String], cols: u16, rows: u16) -> io::Result<()> {
        let text = self.res.palette.text;
        let top = (rows / 2).saturating_sub(lines.len() as u16 / 2);
        queue!(self.out, style::SetForegroundColor(color(text)))?;
        for (i, line) in lines.iter().enumerate() {
            let x = (cols / 2).saturating_sub(line.len() as u16 / 2);
            let y = top + i as u16;
            if y >= rows {
                break;
            }
            let visible: String = line.chars().take(cols as usize).collect();
            queue!(self.out, cursor::MoveTo(x, y), style::Print(visible))?;
        }
        queue!(self.out, style::ResetColor)
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Draw a frame into a `cols` x `rows` character grid
    pub fn draw_sized(&mut self, frame: &Frame, cols: u16, rows: u16) -> Result<(), FrontendError> {
        self.fps.record(Instant::now());
        let (pw, ph) = (cols as usize, rows as usize * 2);
        self.buf.resize(pw, ph, self.res.palette.letterbox);
        let vp = Viewport::fit(frame.screen, IVec2::new(pw as i32, ph as i32));

        self.draw_sky(&vp);
        for sprite in frame.sprites.iter().rev() {
            match sprite.kind {
                SpriteKind::Ground => self.draw_ground(&vp, sprite),
                SpriteKind::ObstacleLower | SpriteKind::ObstacleUpper => {
                    self.draw_obstacle(&vp, sprite)
                }
                SpriteKind::Actor => {}
            }
        }
        // Actor goes on top of everything else
        if let Some(actor) = frame.sprites.iter().find(|s| s.kind == SpriteKind::Actor) {
            self.draw_actor(&vp, actor);
        }
        self.draw_letterbox(&vp);

        let overlay = overlay_lines(frame);
        if matches!(frame.phase, GamePhase::Ended | GamePhase::AwaitingRestart) {
            self.dim();
        } else {
            let dot = ((vp.scale * 6.0).round() as i32).max(1);
            let cx = vp.offset.x + vp.size.x / 2;
            let y = vp.offset.y + vp.len(40.0);
            draw_number(&mut self.buf, &self.res.palette, cx, y, frame.score, dot);
        }

        self.buf.render(&mut self.out)?;
        self.write_overlay(&overlay, cols, rows)?;
        if self.res.show_fps {
            if let Some(fps) = self.fps.fps() {
                queue!(
                    self.out,
                    cursor::MoveTo(0, 0),
                    style::SetForegroundColor(color(self.res.palette.text)),
                    style::Print(format!("{fps} fps")),
                    style::ResetColor
                )?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn draw(&mut self, frame: &Frame) -> Result<(), FrontendError> {
        let (cols, rows) = terminal::size()?;
        self.draw_sized(frame, cols, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;
    use crate::sim::obstacles::pair_with_split;
    use crate::settings::Settings;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_keymap() {
        assert_eq!(
            map_key(press(KeyCode::Char(' '))),
            &[InputEvent::Jump, InputEvent::Restart]
        );
        assert_eq!(map_key(press(KeyCode::Up)), &[InputEvent::Jump]);
        assert_eq!(map_key(press(KeyCode::Enter)), &[InputEvent::Restart]);
        assert_eq!(map_key(press(KeyCode::Esc)), &[InputEvent::Cancel]);
        assert_eq!(map_key(press(KeyCode::Char('q'))), &[InputEvent::Quit]);
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            &[InputEvent::Quit]
        );
        assert!(map_key(press(KeyCode::Char('c'))).is_empty());
        assert!(map_key(press(KeyCode::Tab)).is_empty());
    }

    #[test]
    fn test_key_release_ignored() {
        let mut key = press(KeyCode::Char(' '));
        key.kind = KeyEventKind::Release;
        assert!(map_key(key).is_empty());
    }

    #[test]
    fn test_viewport_fits_and_centers() {
        // 200x75 terminal -> 200x150 pixels; height limits the scale
        let vp = Viewport::fit(Vec2::new(400.0, 600.0), IVec2::new(200, 150));
        assert_eq!(vp.scale, 0.25);
        assert_eq!(vp.size, IVec2::new(100, 150));
        assert_eq!(vp.offset, IVec2::new(50, 0));
        assert_eq!(vp.to_px(Vec2::ZERO), IVec2::new(50, 0));
        assert_eq!(vp.to_px(Vec2::new(400.0, 600.0)), IVec2::new(150, 150));
        assert_eq!(vp.len(1.0), 1);
        assert_eq!(vp.len(80.0), 20);
    }

    #[test]
    fn test_viewport_degenerate_world() {
        let vp = Viewport::fit(Vec2::ZERO, IVec2::new(80, 48));
        assert_eq!(vp.scale, 0.0);
        assert_eq!(vp.size, IVec2::ZERO);
    }

    #[test]
    fn test_overlay_lines() {
        let state = GameState::new(Tuning::default(), 5).unwrap();
        let mut frame = state.frame();
        assert_eq!(overlay_lines(&frame)[0], "SPACE TO FLAP");

        frame.phase = GamePhase::Playing;
        assert!(overlay_lines(&frame).is_empty());

        frame.phase = GamePhase::AwaitingRestart;
        frame.final_score = Some(4);
        frame.best_score = Some(9);
        assert_eq!(
            overlay_lines(&frame),
            vec!["GAME OVER", "SCORE 4", "BEST 9", "SPACE TO RETRY  ESC TO QUIT"]
        );
    }

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::default();
        let t0 = Instant::now();
        assert_eq!(fps.fps(), None);
        for i in 0..=60 {
            fps.record(t0 + Duration::from_millis(1000 * i / 60));
        }
        assert_eq!(fps.fps(), Some(60));
    }

    #[test]
    fn test_pixel_render_halves() {
        let mut buf = PixelBuf::new();
        buf.resize(2, 4, Rgb(0, 0, 0));
        buf.fill_rect(0, 0, 1, 1, Rgb(255, 0, 0));
        let mut out = Vec::new();
        buf.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches('\u{2580}').count(), 4);
        assert_eq!(text.matches("\r\n").count(), 1);
    }

    /// Truecolor escape fragment crossterm emits for `c`, as fg or bg
    fn rgb_code(c: Rgb) -> String {
        format!("2;{};{};{}m", c.0, c.1, c.2)
    }

    #[test]
    fn test_draw_sized_paints_every_sprite() {
        let tuning = Tuning::default();
        let mut state = GameState::new(tuning.clone(), 8).unwrap();
        // Bring one pair on screen so obstacles are drawn too
        state.round.pairs[0] = pair_with_split(200.0, 200, &tuning);
        let frame = state.frame();

        let res = Resources::from_settings(&Settings::default());
        let palette = res.palette.clone();
        let mut renderer = TerminalRenderer::new(Vec::new(), res, &tuning);
        renderer.draw_sized(&frame, 40, 30).unwrap();
        let text = String::from_utf8(renderer.out).unwrap();

        assert_eq!(text.matches('\u{2580}').count(), 40 * 30);
        for c in [palette.pipe, palette.pipe_edge, palette.ground, palette.grass, palette.actor] {
            assert!(text.contains(&rgb_code(c)), "missing {c:?}");
        }
        assert!(text.contains("SPACE TO FLAP"));
    }

    #[test]
    fn test_draw_sized_game_over_is_dimmed() {
        let tuning = Tuning::default();
        let state = GameState::new(tuning.clone(), 8).unwrap();
        let mut frame = state.frame();
        frame.phase = GamePhase::AwaitingRestart;
        frame.final_score = Some(2);

        let res = Resources::from_settings(&Settings::default());
        let ground = res.palette.ground;
        let mut renderer = TerminalRenderer::new(Vec::new(), res, &tuning);
        renderer.draw_sized(&frame, 40, 30).unwrap();
        let text = String::from_utf8(renderer.out).unwrap();

        let dimmed = Rgb(ground.0 / 2, ground.1 / 2, ground.2 / 2);
        assert!(text.contains(&rgb_code(dimmed)));
        assert!(!text.contains(&rgb_code(ground)));
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("SCORE 2"));
    }
}
