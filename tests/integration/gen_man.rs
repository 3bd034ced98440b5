use crate::common;

#[test]
fn gen_man_outputs_a_troff_page() {
  let out = common::bin().arg("--gen-man").output().unwrap();
  assert!(out.status.success());

  let text = String::from_utf8_lossy(&out.stdout);
  // clap_mangen emits a roff man page with a .TH header naming the binary
  assert!(text.contains(".TH"));
  assert!(text.contains("jenkins-health-report"));
}
