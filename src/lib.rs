// Copyright 2024 The Kubernetes Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Pod DNS configuration injection admission plugin.
//!
//! This crate provides a mutating admission plugin that injects an
//! operator-supplied cluster DNS configuration (nameservers, search domains,
//! resolver options) into the `dnsConfig` of newly created Pods without
//! overriding values the Pod author already set. Webhook registration, TLS
//! serving and request decoding are the host framework's job; this crate
//! starts where decoding ends and stops where re-serialization begins.

pub mod admission;
pub mod api;
pub mod plugins;

// Re-export commonly used types
pub use admission::{Attributes, Handler, Interface, MutationInterface, Operation};
pub use api::core::{DnsPolicy, Pod, PodDnsConfig, PodDnsConfigOption, PodSpec};
