pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

/// Zero-based menu index for a `1`-based digit key.
pub fn digit_index(ch: char) -> Option<usize> {
    let digit = ch.to_digit(10)?;
    (digit >= 1).then(|| digit as usize - 1)
}
