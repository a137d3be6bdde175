// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The trait every configuration producer implements.

/// Build the script fragment of an object.
///
/// The context carries whatever the object needs to know about the rest of the router
/// (e.g. which routing tables already exist). Producers never fail: anything that could be
/// wrong about their input is rejected before rendering.
pub trait Render {
    type Context; /* context passed to renderer */
    type Output; /* type of output produced */
    fn render(&self, ctx: &Self::Context) -> Self::Output;
}
