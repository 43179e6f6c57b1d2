/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//!Ring signatures and linkable ring signatures
//!
//!Given a ring of public keys and the private key of one member,
//!a signature proves that one of the members signed, without revealing which one.
//!
//!The proof is a cyclic chain of challenges `c_0 .. c_(n-1)`:
//!each challenge is the hash of the ring, the message digest and the commitment of the previous member.
//!Only someone who knows one of the private keys can close the chain.

mod signature_utils;
mod ring_signature;
mod partial;

pub use ring_signature::{
    RingSignature,
    Linkability
};
pub use partial::PartialSignature;
