//! Test fixtures - sample sources, patches and templates.

#![allow(dead_code)]

/// Header shipped in the fake source tarball.
pub const CONFIG_H: &str = "/* generated */\n#define HOST \"unknown\"\n";

/// Patch template that sets the configure host in config.h.
pub const HOST_PATCH: &str = r#"--- a/config.h
+++ b/config.h
@@ -1,2 +1,2 @@
 /* generated */
-#define HOST "unknown"
+#define HOST "{{host}}"
"#;

/// Patch that does not match CONFIG_H.
pub const STALE_PATCH: &str = r#"--- a/config.h
+++ b/config.h
@@ -1,2 +1,2 @@
 /* something else entirely */
-#define HOST "other"
+#define HOST "{{host}}"
"#;

/// Template for an NDK environment script.
pub const SETENV_TEMPLATE: &str = r#"#!/bin/sh
export ANDROID_ARCH={{android_arch}}
export TOOLCHAIN={{toolchain}}
./configure --host={{host}}
"#;
