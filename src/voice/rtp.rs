use super::constants::{
    RTP_HEADER_LEN, RTP_OPUS_PAYLOAD_TYPE, RTP_TIMESTAMP_STEP, RTP_VERSION_BYTE,
    UDP_PACKET_BUF_CAPACITY,
};

/// Wraps Opus frames into RTP packets for one stream.
pub struct RtpPacketizer {
    ssrc: u32,
    sequence: u16,
    timestamp: u32,
    /// Allocated once, cleared per frame.
    packet_buf: Vec<u8>,
}

impl RtpPacketizer {
    pub fn new(ssrc: u32) -> Self {
        Self {
            ssrc,
            sequence: 0,
            timestamp: 0,
            packet_buf: Vec::with_capacity(UDP_PACKET_BUF_CAPACITY),
        }
    }

    /// Build the next packet. Sequence and timestamp advance per call.
    pub fn packetize(&mut self, payload: &[u8]) -> &[u8] {
        let sequence = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);

        let timestamp = self.timestamp;
        self.timestamp = self.timestamp.wrapping_add(RTP_TIMESTAMP_STEP);

        let mut header = [0u8; RTP_HEADER_LEN];
        header[0] = RTP_VERSION_BYTE;
        header[1] = RTP_OPUS_PAYLOAD_TYPE;
        header[2..4].copy_from_slice(&sequence.to_be_bytes());
        header[4..8].copy_from_slice(&timestamp.to_be_bytes());
        header[8..12].copy_from_slice(&self.ssrc.to_be_bytes());

        self.packet_buf.clear();
        self.packet_buf.extend_from_slice(&header);
        self.packet_buf.extend_from_slice(payload);
        &self.packet_buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout() {
        let mut rtp = RtpPacketizer::new(0xDEAD_BEEF);
        let packet = rtp.packetize(&[1, 2, 3]).to_vec();
        assert_eq!(packet.len(), RTP_HEADER_LEN + 3);
        assert_eq!(packet[0], 0x80);
        assert_eq!(packet[1], 0x78);
        assert_eq!(&packet[2..4], &[0, 0]);
        assert_eq!(&packet[4..8], &[0, 0, 0, 0]);
        assert_eq!(&packet[8..12], &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(&packet[12..], &[1, 2, 3]);
    }

    #[test]
    fn sequence_and_timestamp_advance() {
        let mut rtp = RtpPacketizer::new(1);
        rtp.packetize(&[]);
        let packet = rtp.packetize(&[]).to_vec();
        assert_eq!(u16::from_be_bytes([packet[2], packet[3]]), 1);
        assert_eq!(
            u32::from_be_bytes([packet[4], packet[5], packet[6], packet[7]]),
            960
        );
    }

    #[test]
    fn sequence_wraps() {
        let mut rtp = RtpPacketizer::new(1);
        rtp.sequence = u16::MAX;
        rtp.packetize(&[]);
        let packet = rtp.packetize(&[]).to_vec();
        assert_eq!(u16::from_be_bytes([packet[2], packet[3]]), 0);
    }
}
