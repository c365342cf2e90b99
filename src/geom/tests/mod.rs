mod test_patch_basic;
