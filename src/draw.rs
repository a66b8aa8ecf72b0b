//! Dxyn: XOR a sprite from memory at I onto the pixel surface
use crate::config::Quirks;
use crate::display::PixelSurface;
use crate::error::Chip8Error;
use crate::instruction::Reg;
use crate::memory::MemoryMap;
use crate::state::Registers;

/// rows a sprite of nominal height `n` actually has
pub fn sprite_rows(n: u8, quirks: &Quirks) -> usize {
    match n {
        0 if quirks.zero_height_sprite_is_sixteen_rows => 16,
        n => n as usize,
    }
}

/// draw `n` rows of 8 pixels at (V[x], V[y]). VF is cleared first, then set
/// if any lit pixel was turned off. the rows are read in full before anything
/// is plotted, so an out-of-range sprite leaves the surface untouched
pub fn draw<M: MemoryMap + ?Sized>(
    surface: &mut dyn PixelSurface,
    mem: &M,
    regs: &mut Registers,
    x: Reg,
    y: Reg,
    n: u8,
    quirks: &Quirks,
) -> Result<(), Chip8Error> {
    let (left, top) = (regs.v[x] as usize, regs.v[y] as usize);
    regs.set_flag(false);
    let rows = mem.get_ro_slice(regs.index as usize, sprite_rows(n, quirks))?;

    let mut collided = false;
    for (dy, row) in rows.iter().enumerate() {
        for dx in 0..8 {
            if row & (0x80 >> dx) != 0 {
                collided |= surface.plot_xor(left + dx, top + dy);
            }
        }
    }
    regs.set_flag(collided);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Framebuffer;
    use crate::memory::{Chip8MemoryMap, MEM_SIZE};
    use crate::state::VF;

    fn setup(sprite: &[u8]) -> (Chip8MemoryMap, Registers) {
        let mut m = Chip8MemoryMap::new();
        m.write(sprite, 0x300).expect("sprite fits");
        let mut r = Registers::default();
        r.index = 0x300;
        (m, r)
    }

    #[test]
    fn test_collision_on_redraw() -> Result<(), Chip8Error> {
        let (m, mut r) = setup(&[0x80]);
        let mut fb = Framebuffer::default();
        r.v[1] = 10;
        r.v[2] = 5;
        draw(&mut fb, &m, &mut r, 1, 2, 1, &Quirks::default())?;
        assert_eq!(r.v[VF], 0);
        assert!(fb.is_set(10, 5));

        draw(&mut fb, &m, &mut r, 1, 2, 1, &Quirks::default())?;
        assert_eq!(r.v[VF], 1);
        assert!(!fb.is_set(10, 5));
        Ok(())
    }

    #[test]
    fn test_msb_is_leftmost() -> Result<(), Chip8Error> {
        let (m, mut r) = setup(&[0b1010_0001]);
        let mut fb = Framebuffer::default();
        draw(&mut fb, &m, &mut r, 0, 0, 1, &Quirks::default())?;
        let lit: Vec<usize> = (0..8).filter(|&x| fb.is_set(x, 0)).collect();
        assert_eq!(lit, vec![0, 2, 7]);
        Ok(())
    }

    #[test]
    fn test_flag_cleared_when_no_collision() -> Result<(), Chip8Error> {
        let (m, mut r) = setup(&[0xff]);
        let mut fb = Framebuffer::default();
        r.v[VF] = 1;
        draw(&mut fb, &m, &mut r, 0, 0, 1, &Quirks::default())?;
        assert_eq!(r.v[VF], 0);
        Ok(())
    }

    #[test]
    fn test_coordinates_read_before_flag() -> Result<(), Chip8Error> {
        let (m, mut r) = setup(&[0x80]);
        let mut fb = Framebuffer::default();
        r.v[VF] = 7;
        draw(&mut fb, &m, &mut r, VF, VF, 1, &Quirks::default())?;
        assert!(fb.is_set(7, 7));
        Ok(())
    }

    #[test]
    fn test_zero_height() -> Result<(), Chip8Error> {
        let (m, mut r) = setup(&[0x80; 16]);
        let mut fb = Framebuffer::default();
        draw(&mut fb, &m, &mut r, 0, 0, 0, &Quirks::default())?;
        assert_eq!(fb.lit_count(), 16);

        let mut fb = Framebuffer::default();
        let quirks = Quirks {
            zero_height_sprite_is_sixteen_rows: false,
            ..Quirks::default()
        };
        draw(&mut fb, &m, &mut r, 0, 0, 0, &quirks)?;
        assert_eq!(fb.lit_count(), 0);
        Ok(())
    }

    #[test]
    fn test_out_of_range_draws_nothing() {
        let (m, mut r) = setup(&[]);
        let mut fb = Framebuffer::default();
        r.index = 0xfffc;
        assert_eq!(
            draw(&mut fb, &m, &mut r, 0, 0, 8, &Quirks::default()),
            Err(Chip8Error::OutOfRange { addr: MEM_SIZE })
        );
        assert_eq!(fb.lit_count(), 0);
        assert_eq!(r.v[VF], 0);
    }
}
