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

//! Core Kubernetes API types (Pod, PodSpec, DNS configuration).

use std::any::Any;
use std::fmt;

/// ApiObject is a trait for Kubernetes API objects that can be used in admission.
pub trait ApiObject: Send + Sync {
    /// Returns the object as Any for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns the object as mutable Any for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the kind of this object.
    fn kind(&self) -> &str;
}

// ============================================================================
// DNS Types
// ============================================================================

/// DnsPolicy defines how a pod's DNS will be configured.
/// This corresponds to core/v1 DNSPolicy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DnsPolicy {
    /// ClusterFirst indicates that the pod should use cluster DNS first
    /// unless hostNetwork is true, falling back to the default (node) policy.
    #[default]
    ClusterFirst,
    /// ClusterFirstWithHostNet indicates that the pod should use cluster DNS
    /// first, even when hostNetwork is true.
    ClusterFirstWithHostNet,
    /// Default indicates that the pod should use the node's DNS settings.
    Default,
    /// None indicates that the pod should use empty DNS settings; DNS
    /// parameters come exclusively from the pod's dnsConfig.
    None,
}

impl DnsPolicy {
    /// Returns the string representation of the DNS policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            DnsPolicy::ClusterFirst => "ClusterFirst",
            DnsPolicy::ClusterFirstWithHostNet => "ClusterFirstWithHostNet",
            DnsPolicy::Default => "Default",
            DnsPolicy::None => "None",
        }
    }

    /// Parse a DNS policy from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ClusterFirst" => Some(DnsPolicy::ClusterFirst),
            "ClusterFirstWithHostNet" => Some(DnsPolicy::ClusterFirstWithHostNet),
            "Default" => Some(DnsPolicy::Default),
            "None" => Some(DnsPolicy::None),
            _ => Option::None,
        }
    }
}

impl fmt::Display for DnsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// PodDNSConfigOption is a single DNS resolver option (e.g. ndots:5).
/// The value is optional on the wire; an option may be a bare flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodDnsConfigOption {
    /// Name of the option.
    pub name: String,
    /// Value of the option, if any.
    pub value: Option<String>,
}

impl PodDnsConfigOption {
    /// Create a new option with a value.
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }
}

/// PodDnsConfig defines the DNS parameters of a pod in addition to those
/// generated from its DnsPolicy. This corresponds to core/v1 PodDNSConfig.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PodDnsConfig {
    /// A list of DNS name server IP addresses, queried in order.
    pub nameservers: Vec<String>,
    /// A list of DNS search domains for host-name lookup, tried in order.
    pub searches: Vec<String>,
    /// A list of DNS resolver options.
    pub options: Vec<PodDnsConfigOption>,
}

// ============================================================================
// Pod
// ============================================================================

/// PodSpec is the specification of a pod, reduced to the fields that matter
/// for DNS admission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PodSpec {
    /// Set DNS policy for the pod.
    pub dns_policy: DnsPolicy,
    /// Specifies the DNS parameters of the pod. `None` means the pod carries
    /// no dnsConfig block at all, which is distinct from an empty block.
    pub dns_config: Option<PodDnsConfig>,
}

/// Pod represents a Kubernetes pod.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pod {
    /// Name of the pod.
    pub name: String,
    /// Namespace of the pod.
    pub namespace: String,
    /// Specification of the desired behavior of the pod.
    pub spec: PodSpec,
}

impl Pod {
    /// Create a new pod with the given name and namespace.
    pub fn new(name: &str, namespace: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            spec: PodSpec::default(),
        }
    }
}

impl ApiObject for Pod {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn kind(&self) -> &str {
        "Pod"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dns_policy_display() {
        assert_eq!(format!("{}", DnsPolicy::ClusterFirst), "ClusterFirst");
        assert_eq!(
            format!("{}", DnsPolicy::ClusterFirstWithHostNet),
            "ClusterFirstWithHostNet"
        );
        assert_eq!(format!("{}", DnsPolicy::Default), "Default");
        assert_eq!(format!("{}", DnsPolicy::None), "None");
    }

    #[test]
    fn test_dns_policy_from_str() {
        assert_eq!(DnsPolicy::from_str("ClusterFirst"), Some(DnsPolicy::ClusterFirst));
        assert_eq!(DnsPolicy::from_str("None"), Some(DnsPolicy::None));
        assert_eq!(DnsPolicy::from_str("none"), Option::None);
        assert_eq!(DnsPolicy::from_str(""), Option::None);
    }

    #[test]
    fn test_dns_policy_default() {
        assert_eq!(DnsPolicy::default(), DnsPolicy::ClusterFirst);
    }

    #[test]
    fn test_pod_new() {
        let pod = Pod::new("test-pod", "kube-system");
        assert_eq!(pod.name, "test-pod");
        assert_eq!(pod.namespace, "kube-system");
        assert_eq!(pod.spec.dns_policy, DnsPolicy::ClusterFirst);
        assert!(pod.spec.dns_config.is_none());
        assert_eq!(pod.kind(), "Pod");
    }

    #[test]
    fn test_pod_dns_config_option_new() {
        let opt = PodDnsConfigOption::new("ndots", "5");
        assert_eq!(opt.name, "ndots");
        assert_eq!(opt.value.as_deref(), Some("5"));
    }

    #[test]
    fn test_api_object_downcast() {
        let pod = Pod::new("test", "default");
        let obj: Box<dyn ApiObject> = Box::new(pod);
        assert!(obj.as_any().downcast_ref::<Pod>().is_some());
    }
}
