/// XOR of all data bytes. The length byte is not included.
pub(crate) fn xor_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0, |acc, byte| acc ^ byte)
}
