use opaque_ke::CipherSuite;
use opaque_ke::ksf::Identity;
use opaque_ke::key_exchange::tripledh::TripleDh;

/// The OPAQUE cipher suite used throughout the provider: ristretto255 for
/// both the OPRF and the key-exchange group, triple-DH key exchange, and no
/// additional slow-hash stretching on the OPRF output (the PAKE library's
/// OPRF evaluation already resists offline dictionary attacks; an
/// additional KSF would only add latency for this deployment).
pub struct DarkAuthSuite;

impl CipherSuite for DarkAuthSuite {
    type OprfCs = opaque_ke::Ristretto255;
    type KeGroup = opaque_ke::Ristretto255;
    type KeyExchange = TripleDh;
    type Ksf = Identity;
}
