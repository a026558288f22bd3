/// Cursor over a fixed buffer, used to lay out frame heads.
pub struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    #[inline]
    pub fn new(buf: &'a mut [u8]) -> Self { Writer { buf, pos: 0 } }

    #[inline]
    pub const fn pos(&self) -> usize { self.pos }

    #[inline]
    pub fn remaining(&self) -> usize { self.buf.len() - self.pos }

    /// Copy `src` if it fits, otherwise leave the buffer untouched
    /// and return the error produced by `f`.
    #[inline]
    pub fn write_or_err<F, E>(&mut self, src: &[u8], f: F) -> Result<usize, E>
    where
        F: Fn() -> E,
    {
        if self.remaining() < src.len() {
            return Err(f());
        }
        let end = self.pos + src.len();
        self.buf[self.pos..end].copy_from_slice(src);
        self.pos = end;
        Ok(src.len())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn write_until_full() {
        let mut buf = [0u8; 8];
        let mut writer = Writer::new(&mut buf);

        for i in 0..4u8 {
            let n = writer.write_or_err(&[i, i], || ()).unwrap();
            assert_eq!(n, 2);
            assert_eq!(writer.pos(), 2 * (i as usize + 1));
        }

        assert_eq!(writer.remaining(), 0);
        assert!(writer.write_or_err(&[0xff], || ()).is_err());
        assert_eq!(buf, [0, 0, 1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn partial_does_not_write() {
        let mut buf = [0u8; 3];
        let mut writer = Writer::new(&mut buf);
        writer.write_or_err(&[1, 2], || ()).unwrap();
        assert!(writer.write_or_err(&[3, 4], || ()).is_err());
        assert_eq!(writer.pos(), 2);
        assert_eq!(buf, [1, 2, 0]);
    }
}
