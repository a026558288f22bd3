//! Some dirty work

mod writer;

pub(crate) use writer::Writer;

/// Clamp a buffer length to what is left of a `u64` length.
#[inline]
pub(crate) fn min_len(buf_len: usize, length: u64) -> usize {
    #[cfg(target_pointer_width = "64")]
    {
        std::cmp::min(buf_len, length as usize)
    }

    #[cfg(not(target_pointer_width = "64"))]
    {
        let length = std::cmp::min(usize::MAX as u64, length) as usize;
        std::cmp::min(buf_len, length)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clamp_len() {
        assert_eq!(min_len(10, 0), 0);
        assert_eq!(min_len(10, 4), 4);
        assert_eq!(min_len(10, 10), 10);
        assert_eq!(min_len(10, u64::MAX), 10);
    }
}
